//! REPL command parsing.

use anyhow::{anyhow, bail, Context, Result};
use aura_core::RegulationMode;

/// Cap on `inject <n>` so a typo cannot queue thousands of spikes.
const MAX_BATCH: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Inject `n` failures back to back.
    Inject(u32),
    Mode(RegulationMode),
    Status,
    /// Print the snapshot as JSON.
    Json,
    Wait(u64),
    Classify { valence: f32, arousal: f32 },
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  inject [n]              inject n failures (default 1)
  mode <reactive|regulated>
                          switch architecture (resets stress and log)
  status                  show stress, controller and log
  json                    dump the current snapshot as JSON
  wait <ms>               sleep and let timers run
  classify <v> <a>        label a valence/arousal point
  help                    this text
  quit                    exit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<ReplCommand>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let cmd = match head.to_ascii_lowercase().as_str() {
        "inject" | "i" => {
            let n = match args.first() {
                Some(n) => n
                    .parse::<u32>()
                    .with_context(|| format!("invalid count '{}'", n))?,
                None => 1,
            };
            if n == 0 || n > MAX_BATCH {
                bail!("count must be between 1 and {}", MAX_BATCH);
            }
            ReplCommand::Inject(n)
        }
        "mode" | "m" => {
            let mode = args
                .first()
                .ok_or_else(|| anyhow!("usage: mode <reactive|regulated>"))?;
            ReplCommand::Mode(mode.parse()?)
        }
        "status" | "s" => ReplCommand::Status,
        "json" => ReplCommand::Json,
        "wait" | "w" => {
            let ms = args.first().ok_or_else(|| anyhow!("usage: wait <ms>"))?;
            ReplCommand::Wait(
                ms.parse()
                    .with_context(|| format!("invalid duration '{}'", ms))?,
            )
        }
        "classify" | "c" => {
            let [v, a] = args.as_slice() else {
                bail!("usage: classify <valence> <arousal>");
            };
            ReplCommand::Classify {
                valence: v.parse().with_context(|| format!("invalid valence '{}'", v))?,
                arousal: a.parse().with_context(|| format!("invalid arousal '{}'", a))?,
            }
        }
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(Some(cmd))
}
