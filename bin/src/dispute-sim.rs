use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use dispute_solvers::fault::{
    AlphabetTraceProvider, BisectionSolver, Claim, ClaimData, FaultSolver, Position, Response,
    TraceProvider,
};
use serde::Serialize;
use tracing::Level;

/// Arguments for the `dispute-sim` binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbosity level (0-4)
    #[arg(long, short, help = "Verbosity level (0-4)", action = ArgAction::Count, env = "VERBOSITY")]
    v: u8,

    /// The maximum depth of the game tree.
    #[arg(
        long,
        short = 'd',
        help = "The maximum depth of the game tree.",
        default_value_t = 3,
        env = "DISPUTE_SIM_MAX_DEPTH"
    )]
    max_depth: u64,

    /// The trace of the honest challenger.
    #[arg(
        long,
        help = "The alphabet trace of the honest challenger.",
        default_value = "abcdefgh",
        env = "DISPUTE_SIM_HONEST_TRACE"
    )]
    honest_trace: String,

    /// The trace of the dishonest proposer, who makes the root claim.
    #[arg(
        long,
        help = "The alphabet trace of the dishonest proposer, who makes the root claim.",
        default_value = "abcdexyz",
        env = "DISPUTE_SIM_DISHONEST_TRACE"
    )]
    dishonest_trace: String,

    /// Print the transcript as JSON.
    #[arg(long, help = "Print the transcript as JSON.")]
    json: bool,
}

/// A participant in the simulated dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
enum Player {
    Honest,
    Dishonest,
}

impl Player {
    fn opponent(self) -> Self {
        match self {
            Self::Honest => Self::Dishonest,
            Self::Dishonest => Self::Honest,
        }
    }
}

/// A single turn of the simulated dispute: who responded, to what, and how.
#[derive(Debug, Serialize)]
struct Turn {
    player: Player,
    claim: Claim,
    response: Response,
}

fn main() -> Result<()> {
    // Parse the command arguments
    let Args {
        v,
        max_depth,
        honest_trace,
        dishonest_trace,
        json,
    } = Args::parse();

    // Initialize the tracing subscriber
    init_tracing_subscriber(v)?;

    let honest = BisectionSolver::new(
        max_depth,
        AlphabetTraceProvider::new(&honest_trace, max_depth)?,
    )?;
    let dishonest = BisectionSolver::new(
        max_depth,
        AlphabetTraceProvider::new(&dishonest_trace, max_depth)?,
    )?;
    tracing::info!(target: "dispute-sim", "Solvers created for a game of depth {}.", max_depth);

    // The dishonest proposer opens the dispute with a claim about its own final state.
    let root = ClaimData::new(
        dishonest.provider().state_hash(1u128.trace_index(max_depth))?,
        1,
    );
    let transcript = play(&honest, &dishonest, root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    } else {
        for turn in &transcript {
            println!(
                "{:?} -> claim at position {} (depth {}): {}",
                turn.player,
                turn.claim.data.position,
                turn.claim.depth(),
                describe(&turn.response, max_depth)
            );
        }
    }

    Ok(())
}

/// Plays a single branch of a dispute, starting with the honest challenger responding to `root`,
/// until a player either steps or has nothing to respond with.
fn play(honest: &dyn FaultSolver, dishonest: &dyn FaultSolver, root: ClaimData) -> Result<Vec<Turn>> {
    let mut transcript = Vec::new();
    let mut claim = Claim::root(root);
    let mut player = Player::Honest;

    loop {
        let solver = match player {
            Player::Honest => honest,
            Player::Dishonest => dishonest,
        };
        let response = solver.respond(claim, false)?;
        tracing::debug!(target: "dispute-sim", "{:?} responded to claim at position {}: {:?}", player, claim.data.position, response);

        let next = match &response {
            Response::Move(data) => Some(Claim::new(*data, claim.data)),
            Response::Step(_) | Response::DoNothing => None,
        };
        transcript.push(Turn {
            player,
            claim,
            response,
        });

        match next {
            Some(next) => claim = next,
            None => break,
        }
        player = player.opponent();
    }

    tracing::info!(target: "dispute-sim", "Dispute branch finished after {} turns.", transcript.len());
    Ok(transcript)
}

/// Renders a [Response] for the plain text transcript.
fn describe(response: &Response, max_depth: u64) -> String {
    match response {
        Response::DoNothing => "do nothing".to_string(),
        Response::Move(data) => format!(
            "move to position {} committing to trace index {}",
            data.position,
            data.trace_index(max_depth)
        ),
        Response::Step(step) => format!(
            "{} step at trace index {}",
            if step.is_attack { "attack" } else { "defend" },
            step.leaf_claim.data.trace_index(max_depth)
        ),
    }
}

/// Initializes the tracing subscriber
///
/// # Arguments
/// * `verbosity_level` - The verbosity level (0-4)
///
/// # Returns
/// * `Result<()>` - Ok if successful, Err otherwise.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(match verbosity_level {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod test {
    use super::*;
    use dispute_solvers::fault::alphabet_preimage;

    fn solver(trace: &str) -> BisectionSolver<AlphabetTraceProvider> {
        BisectionSolver::new(3, AlphabetTraceProvider::new(trace, 3).unwrap()).unwrap()
    }

    #[test]
    fn dishonest_root_ends_in_a_step() {
        let (honest, dishonest) = (solver("abcdefgh"), solver("abcdexyz"));
        let root = ClaimData::new(dishonest.provider().state_hash(7).unwrap(), 1);
        let transcript = play(&honest, &dishonest, root).unwrap();

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0].player, Player::Honest);
        for (depth, turn) in transcript.iter().enumerate() {
            assert_eq!(turn.claim.depth(), depth as u64);
        }
        match &transcript[3].response {
            Response::Step(step) => {
                assert!(!step.is_attack);
                assert_eq!(step.pre_state, alphabet_preimage(4, b'e'));
            }
            other => panic!("expected a step, got {:?}", other),
        }
    }

    #[test]
    fn honest_root_is_left_alone() {
        let honest = solver("abcdefgh");
        let root = ClaimData::new(honest.provider().state_hash(7).unwrap(), 1);
        let transcript = play(&honest, &honest, root).unwrap();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].response, Response::DoNothing);
        assert_eq!(describe(&transcript[0].response, 3), "do nothing");
    }

    #[test]
    fn transcript_serializes() {
        let (honest, dishonest) = (solver("abcdefgh"), solver("abcdexyz"));
        let root = ClaimData::new(dishonest.provider().state_hash(7).unwrap(), 1);
        let transcript = play(&honest, &dishonest, root).unwrap();

        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(json[0]["player"], "Honest");
        assert_eq!(json[1]["claim"]["data"]["position"], 2);
    }
}
