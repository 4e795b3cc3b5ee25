use a2c_core::record::{Record, Recorder};
use anyhow::{anyhow, Result};
use log::trace;
use plotters::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A [`Recorder`] that redraws a line graph of a scalar against another one
/// after every written record.
///
/// By default the graph is the smoothed score (`score_avg`) against the
/// episode index (`episode`), drawn as a blue line. Records without both
/// keys are ignored. The graph has no text, so no font is needed.
pub struct ScoreGraphRecorder {
    path: PathBuf,
    size: (u32, u32),
    key_x: String,
    key_y: String,
    points: Vec<(f32, f32)>,
}

impl ScoreGraphRecorder {
    /// Constructs a recorder writing to `path`.
    ///
    /// The parent directory is created if it does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        Ok(Self {
            path,
            size: (640, 480),
            key_x: "episode".to_string(),
            key_y: "score_avg".to_string(),
            points: vec![],
        })
    }

    /// Sets the image size in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Sets the keys of the values on the x and y axes.
    pub fn keys(mut self, key_x: impl Into<String>, key_y: impl Into<String>) -> Self {
        self.key_x = key_x.into();
        self.key_y = key_y.into();
        self
    }

    /// Points drawn so far.
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    fn ranges(&self) -> ((f32, f32), (f32, f32)) {
        let fold = |f: fn(&(f32, f32)) -> f32| {
            self.points
                .iter()
                .map(f)
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let pad = |(lo, hi): (f32, f32)| {
            if hi - lo > f32::EPSILON {
                let m = 0.05 * (hi - lo);
                (lo - m, hi + m)
            } else {
                (lo - 1.0, hi + 1.0)
            }
        };

        (pad(fold(|p| p.0)), pad(fold(|p| p.1)))
    }

    fn draw(&self) -> Result<()> {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("Failed to draw {:?}: {:?}", self.path, e))?;

        let ((x_min, x_max), (y_min, y_max)) = self.ranges();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("Failed to draw {:?}: {:?}", self.path, e))?;

        chart
            .draw_series(LineSeries::new(
                self.points.iter().cloned(),
                BLUE.stroke_width(2),
            ))
            .map_err(|e| anyhow!("Failed to draw {:?}: {:?}", self.path, e))?;

        root.present()
            .map_err(|e| anyhow!("Failed to write {:?}: {:?}", self.path, e))?;
        trace!("Redraw {:?} with {} points", self.path, self.points.len());

        Ok(())
    }
}

impl Recorder for ScoreGraphRecorder {
    fn write(&mut self, record: Record) -> Result<()> {
        let (x, y) = match (record.get_scalar(&self.key_x), record.get_scalar(&self.key_y)) {
            (Ok(x), Ok(y)) => (x, y),
            _ => return Ok(()),
        };
        self.points.push((x, y));
        self.draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2c_core::record::RecordValue;
    use tempdir::TempDir;

    fn record(episode: f32, score_avg: f32) -> Record {
        Record::from_slice(&[
            ("episode", RecordValue::Scalar(episode)),
            ("score_avg", RecordValue::Scalar(score_avg)),
        ])
    }

    #[test]
    fn test_draws_png() -> Result<()> {
        let dir = TempDir::new("score_graph")?;
        let path = dir.path().join("save_graph").join("a2c.png");
        let mut recorder = ScoreGraphRecorder::new(&path)?.size(320, 240);

        recorder.write(record(0.0, 10.0))?;
        assert!(path.exists());

        recorder.write(record(1.0, 12.0))?;
        recorder.write(record(2.0, 15.5))?;
        assert_eq!(recorder.points().len(), 3);

        let bytes = fs::read(&path)?;
        assert_eq!(&bytes[1..4], b"PNG");
        Ok(())
    }

    #[test]
    fn test_ignores_records_without_keys() -> Result<()> {
        let dir = TempDir::new("score_graph")?;
        let path = dir.path().join("a2c.png");
        let mut recorder = ScoreGraphRecorder::new(&path)?;

        recorder.write(Record::from_scalar("loss", 0.1))?;
        assert!(recorder.points().is_empty());
        assert!(!path.exists());
        Ok(())
    }
}
