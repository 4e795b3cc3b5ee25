use a2c_candle_agent::a2c::{A2c, A2cConfig, ActorCritic, ActorCriticConfig};
use a2c_cartpole_env::{register_with_config, CartPoleConfig, ContinuousCartPoleEnv, ENV_ID};
use a2c_core::{
    record::Record, Agent as _, Env as _, EnvRegistry, Evaluator as _, DefaultEvaluator,
    TimeLimit, Trainer, TrainerConfig, TrainingState,
};
use a2c_plot::ScoreGraphRecorder;
use anyhow::Result;
use clap::Parser;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};

const MODEL_DIR: &str = "./save_model";
const GRAPH_PATH: &str = "./save_graph/a2c.png";
const N_EPISODES_PER_EVAL: usize = 5;

type Env = TimeLimit<ContinuousCartPoleEnv>;
type Agent = A2c<Env, ActorCritic>;

/// Configuration of a run, saved next to the model parameters.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Clone)]
struct RunConfig {
    trainer: TrainerConfig,
    agent: A2cConfig<ActorCriticConfig>,
    env: CartPoleConfig,
}

impl RunConfig {
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    fn seed(mut self, seed: u64) -> Self {
        self.agent.seed = seed;
        self
    }
}

/// Train/eval A2C agent in CartPole with a continuous action
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train A2C agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate A2C agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,

    /// Directory of the model parameters
    #[arg(long, default_value = MODEL_DIR)]
    model_dir: String,

    /// PNG file of the score graph
    #[arg(long, default_value = GRAPH_PATH)]
    graph_path: String,

    /// YAML file of the run configuration
    #[arg(long)]
    config: Option<String>,

    /// Random seed of the agent and the environment
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of training episodes
    #[arg(long)]
    max_episodes: Option<usize>,

    /// Number of evaluation episodes
    #[arg(long, default_value_t = N_EPISODES_PER_EVAL)]
    eval_episodes: usize,
}

fn create_env(config: &RunConfig) -> Result<Env> {
    let mut registry = EnvRegistry::<ContinuousCartPoleEnv>::new();
    register_with_config(&mut registry, config.env.clone())?;
    registry.make(ENV_ID, config.agent.seed as i64)
}

fn create_agent(config: &RunConfig, env: &Env) -> Result<Agent> {
    let model_config = config
        .agent
        .model_config
        .clone()
        .unwrap_or_default()
        .in_dim(env.observation_space().shape())
        .out_dim(env.action_space().shape());
    let agent_config = config
        .agent
        .clone()
        .model_config(model_config)
        .max_action(env.action_space().high[0]);
    Agent::build(agent_config)
}

fn train(config: &RunConfig, model_dir: &str, graph_path: &str) -> Result<TrainingState> {
    let mut env = create_env(config)?;
    let mut agent = create_agent(config, &env)?;
    let mut recorder = ScoreGraphRecorder::new(graph_path)?;
    let mut trainer = Trainer::build(config.trainer.clone().model_dir(model_dir));

    fs::create_dir_all(model_dir)?;
    config.save(Path::new(model_dir).join("config.yaml"))?;

    let state = trainer.train(&mut env, &mut agent, &mut recorder)?;
    info!(
        "Finished training: {} episodes, {} optimization steps, score avg {:.2}, solved: {}",
        state.episodes.len(),
        state.opt_steps,
        state.score_avg,
        state.solved
    );

    Ok(state)
}

fn eval(config: &RunConfig, model_dir: &str, n_episodes: usize) -> Result<Record> {
    let env = create_env(config)?;
    let mut agent = create_agent(config, &env)?;
    agent.load_params(Path::new(model_dir))?;
    agent.eval();

    let record = DefaultEvaluator::from_env(env, n_episodes).evaluate(&mut agent)?;
    info!(
        "Evaluation over {} episodes: return {:.1}",
        n_episodes,
        record.get_scalar("episode_return")?
    );

    Ok(record)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(max_episodes) = args.max_episodes {
        config.trainer = config.trainer.max_episodes(max_episodes);
    }

    if args.eval && !args.train {
        eval(&config, &args.model_dir, args.eval_episodes)?;
    } else {
        train(&config, &args.model_dir, &args.graph_path)?;
        if args.eval {
            eval(&config, &args.model_dir, args.eval_episodes)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_a2c_cartpole() -> Result<()> {
        let dir = TempDir::new("a2c_cartpole")?;
        let model_dir = dir.path().join("save_model");
        let model_dir = model_dir.to_str().unwrap();
        let graph_path = dir.path().join("save_graph").join("a2c.png");
        let graph_path = graph_path.to_str().unwrap();

        let mut config = RunConfig::default().seed(1);
        config.trainer = config.trainer.max_episodes(3).save_interval(1);

        let state = train(&config, model_dir, graph_path)?;
        assert_eq!(state.scores.len(), 3);
        assert!(!state.solved);
        assert!(Path::new(model_dir).join("a2c.safetensors").exists());
        assert!(Path::new(graph_path).exists());

        let config_ = RunConfig::load(Path::new(model_dir).join("config.yaml"))?;
        assert_eq!(config, config_);

        let record = eval(&config, model_dir, 2)?;
        let ret = record.get_scalar("episode_return")?;
        assert!(ret >= 1.0 && ret <= 500.0);

        Ok(())
    }
}
