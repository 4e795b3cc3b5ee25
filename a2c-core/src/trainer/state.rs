/// Progress of a training run.
///
/// Threaded through the episode loop of [`Trainer`](super::Trainer) and
/// returned when it ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingState {
    /// Smoothed score after each episode.
    pub scores: Vec<f32>,

    /// Index of each finished episode.
    pub episodes: Vec<usize>,

    /// Exponential moving average of the episode scores.
    pub score_avg: f32,

    /// Number of optimization steps so far.
    pub opt_steps: usize,

    /// `true` if training stopped because the score threshold was exceeded.
    pub solved: bool,
}

impl TrainingState {
    /// Folds the score of a finished episode into the moving average.
    ///
    /// The first nonzero average is the score itself.
    pub fn update_score(&mut self, episode: usize, score: f32, smoothing: f32) {
        self.score_avg = if self.score_avg != 0.0 {
            smoothing * self.score_avg + (1.0 - smoothing) * score
        } else {
            score
        };
        self.scores.push(self.score_avg);
        self.episodes.push(episode);
    }
}
