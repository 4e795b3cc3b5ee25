use a2c_candle_agent::{
    a2c::{A2c, A2cConfig, ActorCritic, ActorCriticConfig},
    opt::OptimizerConfig,
};
use a2c_core::{
    dummy::{DummyAct, DummyEnv, DummyObs},
    Agent, Policy, Transition,
};
use anyhow::Result;
use candle_core::Tensor;
use tempdir::TempDir;

type Agent1 = A2c<DummyEnv, ActorCritic>;

fn config() -> A2cConfig<ActorCriticConfig> {
    A2cConfig::default().model_config(ActorCriticConfig::default().in_dim(1).out_dim(1))
}

fn params(agent: &Agent1) -> Result<Vec<Tensor>> {
    let data = agent.varmap().data().lock().unwrap();
    let mut names: Vec<_> = data.keys().cloned().collect();
    names.sort();
    Ok(names
        .iter()
        .map(|k| data[k].as_tensor().copy())
        .collect::<candle_core::Result<Vec<_>>>()?)
}

fn max_abs_diff(t1: &[Tensor], t2: &[Tensor]) -> Result<f32> {
    let mut max = 0f32;
    for (a, b) in t1.iter().zip(t2.iter()) {
        let d = (a - b)?.abs()?.flatten_all()?.max(0)?.to_scalar::<f32>()?;
        max = max.max(d);
    }
    Ok(max)
}

#[test]
fn test_action_within_bounds() -> Result<()> {
    let mut agent = Agent1::build(config().max_action(1e-3))?;

    for i in 0..200 {
        let act: DummyAct = agent.get_action(&DummyObs(i))?;
        assert!(act.0.abs() <= 1e-3);
    }

    agent.eval();
    let act: DummyAct = agent.sample(&DummyObs(3))?;
    assert!(act.0.abs() <= 1e-3);
    Ok(())
}

#[test]
fn test_train_model_updates_params() -> Result<()> {
    let mut agent = Agent1::build(config())?;
    let before = params(&agent)?;

    let losses = agent.train_model(&DummyObs(0), &DummyAct(0.5), -1.0, &DummyObs(1), true)?;
    assert!(losses.critic_loss > 0.0);
    assert!((losses.loss - (0.1 * losses.actor_loss + losses.critic_loss)).abs() < 1e-5);
    assert_eq!(agent.n_opts(), 1);

    let after = params(&agent)?;
    assert!(max_abs_diff(&before, &after)? > 0.0);
    Ok(())
}

#[test]
fn test_critic_loss_of_terminal_transition() -> Result<()> {
    // value is v, target is -1, critic loss is 0.5 * (-1 - v)^2
    let mut agent = Agent1::build(config())?;
    let (_, _, value) = agent.forward(&DummyObs(2))?;
    let v = value.flatten_all()?.to_vec1::<f32>()?[0];

    let losses = agent.train_model(&DummyObs(2), &DummyAct(0.0), -1.0, &DummyObs(3), true)?;
    assert!((losses.critic_loss - 0.5 * (-1.0 - v).powi(2)).abs() < 1e-5);
    Ok(())
}

#[test]
fn test_losses_of_non_terminal_transition() -> Result<()> {
    let mut agent = Agent1::build(config().discount_factor(0.9))?;
    let scalar = |t: Tensor| -> Result<f32> { Ok(t.flatten_all()?.to_vec1::<f32>()?[0]) };
    let (mu, sigma, value) = agent.forward(&DummyObs(2))?;
    let (mu, sigma, v) = (scalar(mu)?, scalar(sigma)?, scalar(value)?);
    let (_, _, next_value) = agent.forward(&DummyObs(3))?;
    let next_v = scalar(next_value)?;

    let act = 0.3f32;
    let target = 0.1 + 0.9 * next_v;
    let advantage = target - v;
    let density = (-0.5 * ((act - mu) / sigma).powi(2)).exp()
        / (sigma * (2.0 * std::f32::consts::PI).sqrt());
    let actor_loss = -(density + 1e-5).ln() * advantage;
    let critic_loss = 0.5 * advantage.powi(2);

    let losses = agent.train_model(&DummyObs(2), &DummyAct(act), 0.1, &DummyObs(3), false)?;
    assert!((losses.actor_loss - actor_loss).abs() < 1e-4 * actor_loss.abs().max(1.0));
    assert!((losses.critic_loss - critic_loss).abs() < 1e-5);
    assert!((losses.loss - (0.1 * actor_loss + critic_loss)).abs() < 1e-4);
    Ok(())
}

#[test]
fn test_identical_state_gives_identical_losses() -> Result<()> {
    let dir = TempDir::new("a2c")?;
    let agent1 = &mut Agent1::build(config())?;
    agent1.save_params(dir.path())?;
    assert!(dir.path().join("a2c.safetensors").exists());

    let agent2 = &mut Agent1::build(config())?;
    agent2.load_params(dir.path())?;
    assert_eq!(max_abs_diff(&params(agent1)?, &params(agent2)?)?, 0.0);

    for i in 0..5 {
        let transition = Transition::<DummyEnv>::new(
            DummyObs(i),
            DummyAct(0.1 * i as f32),
            0.1,
            DummyObs(i + 1),
            false,
        );
        let r1 = agent1.opt_with_record(&transition)?;
        let r2 = agent2.opt_with_record(&transition)?;
        for key in ["loss", "actor_loss", "critic_loss"].iter() {
            assert_eq!(r1.get_scalar(key)?, r2.get_scalar(key)?);
        }
    }
    Ok(())
}

#[test]
fn test_adam_step_is_bounded_by_lr() -> Result<()> {
    // With a single Adam step the change of each element is at most about lr.
    let lr = 0.01;
    let mut agent = Agent1::build(
        config()
            .opt_config(OptimizerConfig::default().learning_rate(lr))
            .max_grad_norm(Some(1.0)),
    )?;
    let before = params(&agent)?;
    agent.train_model(&DummyObs(50), &DummyAct(1.0), 100.0, &DummyObs(51), false)?;
    let after = params(&agent)?;
    assert!(max_abs_diff(&before, &after)? <= lr as f32 * 1.01);
    Ok(())
}

#[test]
fn test_load_missing_file_is_error() -> Result<()> {
    let dir = TempDir::new("a2c_missing")?;
    let mut agent = Agent1::build(config())?;
    assert!(agent.load_params(dir.path()).is_err());
    Ok(())
}
