//! Demo command parsing
//!
//! Each line typed into `cadence demo` becomes a [`DemoCommand`], which in
//! turn expands into the control inputs a real surface would produce.

use crate::error::{CliError, Result};
use cadence_control::{ControlInput, ControllerConfig};

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum DemoCommand {
    Play,
    Pause,
    Toggle,
    /// Skip back, by the configured amount unless given
    Back(Option<f64>),
    /// Skip forward, by the configured amount unless given
    Forward(Option<f64>),
    /// Click on the seek control
    Seek(f64),
    /// Grab the seek control, move it through each position, release on the last
    Drag(Vec<f64>),
    Volume(f64),
    Speed(f64),
    Mute,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  play | pause | toggle     start or stop playback
  back [s] | fwd [s]        skip back or forward
  seek <s>                  click the seek control at <s> seconds
  drag <s> <s>...           drag the seek control, releasing on the last value
  vol <0..1>                set the volume
  speed <rate>              set the playback rate
  mute                      toggle mute
  status                    show the engine state
  help                      show this message
  quit                      stop and exit";

impl DemoCommand {
    /// Parse a line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_ascii_lowercase().as_str() {
            "play" => DemoCommand::Play,
            "pause" => DemoCommand::Pause,
            "toggle" | "p" => DemoCommand::Toggle,
            "back" | "b" => DemoCommand::Back(optional_number(name, &args)?),
            "fwd" | "forward" | "f" => DemoCommand::Forward(optional_number(name, &args)?),
            "seek" => DemoCommand::Seek(required_number(name, &args)?),
            "drag" => {
                if args.is_empty() {
                    return Err(invalid(name, "expected at least one position"));
                }
                let positions = args
                    .iter()
                    .map(|arg| number(name, arg))
                    .collect::<Result<Vec<_>>>()?;
                DemoCommand::Drag(positions)
            }
            "vol" | "volume" => DemoCommand::Volume(required_number(name, &args)?),
            "speed" | "rate" => DemoCommand::Speed(required_number(name, &args)?),
            "mute" | "m" => DemoCommand::Mute,
            "status" | "s" => DemoCommand::Status,
            "help" | "?" => DemoCommand::Help,
            "quit" | "exit" | "q" => DemoCommand::Quit,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }

    /// Control inputs this command produces, given whether the engine is paused.
    ///
    /// `play` and `pause` only press the button when it would change state.
    pub fn inputs(&self, config: &ControllerConfig, paused: bool) -> Vec<ControlInput> {
        match self {
            DemoCommand::Play if paused => vec![ControlInput::PlayPause],
            DemoCommand::Pause if !paused => vec![ControlInput::PlayPause],
            DemoCommand::Toggle => vec![ControlInput::PlayPause],
            DemoCommand::Back(seconds) => {
                vec![ControlInput::SkipBack(seconds.unwrap_or(config.skip_back_secs))]
            }
            DemoCommand::Forward(seconds) => {
                vec![ControlInput::SkipForward(
                    seconds.unwrap_or(config.skip_forward_secs),
                )]
            }
            DemoCommand::Seek(position) => vec![ControlInput::SeekClick(*position)],
            DemoCommand::Drag(positions) => {
                let mut inputs = vec![ControlInput::SeekGrab];
                inputs.extend(positions.iter().map(|&p| ControlInput::SeekInput(p)));
                if let Some(&last) = positions.last() {
                    inputs.push(ControlInput::SeekRelease(last));
                }
                inputs
            }
            DemoCommand::Volume(volume) => vec![ControlInput::Volume(*volume)],
            DemoCommand::Speed(rate) => vec![ControlInput::Speed(*rate)],
            DemoCommand::Mute => vec![ControlInput::MuteToggle],
            DemoCommand::Play
            | DemoCommand::Pause
            | DemoCommand::Status
            | DemoCommand::Help
            | DemoCommand::Quit => Vec::new(),
        }
    }
}

fn invalid(command: &str, message: impl Into<String>) -> CliError {
    CliError::InvalidArgument {
        command: command.to_string(),
        message: message.into(),
    }
}

// Non-finite values ("nan", "inf") parse and are left to the controller to reject
fn number(command: &str, arg: &str) -> Result<f64> {
    arg.parse::<f64>()
        .map_err(|_| invalid(command, format!("'{}' is not a number", arg)))
}

fn optional_number(command: &str, args: &[&str]) -> Result<Option<f64>> {
    match args {
        [] => Ok(None),
        [arg] => number(command, arg).map(Some),
        _ => Err(invalid(command, "expected at most one value")),
    }
}

fn required_number(command: &str, args: &[&str]) -> Result<f64> {
    match args {
        [arg] => number(command, arg),
        [] => Err(invalid(command, "expected a value")),
        _ => Err(invalid(command, "expected exactly one value")),
    }
}
