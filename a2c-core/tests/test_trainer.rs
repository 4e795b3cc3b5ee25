use a2c_core::{
    dummy::{DummyAgent, DummyEnv, DummyEnvConfig},
    record::{BufferedRecorder, NullRecorder},
    Env, TimeLimit, TimeLimitConfig, Trainer, TrainerConfig,
};
use anyhow::Result;
use std::path::PathBuf;

fn env(config: DummyEnvConfig, max_episode_steps: Option<usize>) -> Result<TimeLimit<DummyEnv>> {
    TimeLimit::build(&TimeLimitConfig::new(config, max_episode_steps), 0)
}

#[test]
fn test_one_step_episode() -> Result<()> {
    let mut env = env(DummyEnvConfig::default().terminate_after(1), None)?;
    let mut agent = DummyAgent::new();
    let mut recorder = BufferedRecorder::new();
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(1));

    let state = trainer.train(&mut env, &mut agent, &mut recorder)?;

    assert_eq!(agent.n_opts, 1);
    assert_eq!(state.opt_steps, 1);
    assert_eq!(state.scores, vec![1.0]);
    assert_eq!(agent.dones, vec![true]);
    assert!(!state.solved);

    let record = recorder.iter().next().unwrap();
    assert_eq!(record.get_scalar("episode")?, 0.0);
    assert_eq!(record.get_scalar("score")?, 1.0);
    assert_eq!(record.get_scalar("score_avg")?, 1.0);
    assert_eq!(record.get_scalar("loss")?, -1.0);
    assert!(record.get_datetime("datetime").is_ok());
    Ok(())
}

#[test]
fn test_checkpoint_interval() -> Result<()> {
    let mut env = env(DummyEnvConfig::default().terminate_after(1), None)?;
    let mut agent = DummyAgent::new();
    let config = TrainerConfig::default()
        .max_episodes(120)
        .save_interval(50)
        .model_dir("model");
    let mut trainer = Trainer::build(config);

    let state = trainer.train(&mut env, &mut agent, &mut NullRecorder::default())?;
    assert_eq!(state.episodes.len(), 120);

    // One optimization step per episode, so n_opts is the episode index plus one.
    let saves = agent.saves.borrow();
    let at: Vec<usize> = saves.iter().map(|(_, n)| *n).collect();
    assert_eq!(at, vec![1, 51, 101]);
    assert!(saves.iter().all(|(p, _)| p == &PathBuf::from("model")));
    Ok(())
}

#[test]
fn test_save_before_exit_when_solved() -> Result<()> {
    // Episodes end by the time limit with a score of 400.
    let mut env = env(DummyEnvConfig::default(), Some(400))?;
    let mut agent = DummyAgent::new();
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(10));

    let state = trainer.train(&mut env, &mut agent, &mut NullRecorder::default())?;

    assert!(state.solved);
    assert_eq!(state.scores, vec![400.0]);
    assert_eq!(agent.saves.borrow().len(), 1);
    assert_eq!(agent.saves.borrow()[0].1, 400);
    Ok(())
}

#[test]
fn test_shaped_rewards() -> Result<()> {
    let mut agent = DummyAgent::new();
    let mut trainer = Trainer::build(TrainerConfig::default().max_episodes(1));

    // Failure on the third step.
    let mut env1 = env(DummyEnvConfig::default().terminate_after(3), None)?;
    trainer.train(&mut env1, &mut agent, &mut NullRecorder::default())?;
    assert_eq!(agent.rewards, vec![0.1, 0.1, -1.0]);

    // Truncation on the second step.
    let mut agent = DummyAgent::new();
    let mut env2 = env(DummyEnvConfig::default(), Some(2))?;
    trainer.train(&mut env2, &mut agent, &mut NullRecorder::default())?;
    assert_eq!(agent.rewards, vec![0.1, 0.1]);
    assert_eq!(agent.dones, vec![false, true]);
    Ok(())
}

#[test]
fn test_save_disabled() -> Result<()> {
    let mut env = env(DummyEnvConfig::default().terminate_after(1), None)?;
    let mut agent = DummyAgent::new();
    let mut config = TrainerConfig::default().max_episodes(3);
    config.model_dir = None;
    let mut trainer = Trainer::build(config);

    trainer.train(&mut env, &mut agent, &mut NullRecorder::default())?;
    assert!(agent.saves.borrow().is_empty());
    Ok(())
}
