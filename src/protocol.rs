// Judge protocol bindings
//
// This module binds the line-oriented judge protocol to the Bot. The session
// is responsible for:
// - Parsing incoming lines into commands
// - Delegating settings, updates and move requests to the Bot
// - Writing each chosen action back on its own line
//
// Communication happens through stdin/stdout; stderr carries the logs.

use log::{debug, warn};
use std::error::Error;
use std::io::{BufRead, Write};
use std::time::Duration;

use crate::bot::Bot;
use crate::error::ProtocolError;
use crate::types::{Action, PlayerId, Setting};

/// One parsed judge line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Setting(Setting),
    UpdateRound(u32),
    UpdateField(String),
    /// An update this bot does not track
    IgnoredUpdate(String),
    ActionMove { time_bank_ms: u64 },
}

fn argument<'a>(tokens: &[&'a str], index: usize, line: &str) -> Result<&'a str, ProtocolError> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| ProtocolError::MissingArgument {
            command: line.to_string(),
        })
}

fn number<T: std::str::FromStr>(value: &str, line: &str) -> Result<T, ProtocolError> {
    value.parse::<T>().map_err(|_| ProtocolError::InvalidNumber {
        command: line.to_string(),
        value: value.to_string(),
    })
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, ProtocolError> {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.first().copied() {
            Some("settings") => {
                let key = argument(&tokens, 1, line)?;
                let value = argument(&tokens, 2, line)?;
                Self::parse_setting(key, value, line).map(Command::Setting)
            }
            Some("update") => {
                let target = argument(&tokens, 1, line)?;
                let key = argument(&tokens, 2, line)?;
                if target != "game" {
                    return Ok(Command::IgnoredUpdate(line.to_string()));
                }
                match key {
                    "round" => {
                        let value = argument(&tokens, 3, line)?;
                        number(value, line).map(Command::UpdateRound)
                    }
                    "field" => {
                        let value = argument(&tokens, 3, line)?;
                        Ok(Command::UpdateField(value.to_string()))
                    }
                    _ => Ok(Command::IgnoredUpdate(line.to_string())),
                }
            }
            Some("action") => match argument(&tokens, 1, line)? {
                "move" => {
                    let value = argument(&tokens, 2, line)?;
                    number(value, line).map(|time_bank_ms| Command::ActionMove { time_bank_ms })
                }
                _ => Err(ProtocolError::UnknownCommand(line.to_string())),
            },
            _ => Err(ProtocolError::UnknownCommand(line.to_string())),
        }
    }

    fn parse_setting(key: &str, value: &str, line: &str) -> Result<Setting, ProtocolError> {
        let setting = match key {
            "timebank" => Setting::Timebank(Duration::from_millis(number(value, line)?)),
            "time_per_move" => Setting::TimePerMove(Duration::from_millis(number(value, line)?)),
            "player_names" => {
                let mut names = value.split(',');
                match (names.next(), names.next()) {
                    (Some(player0), Some(player1)) => Setting::PlayerNames {
                        player0: player0.to_string(),
                        player1: player1.to_string(),
                    },
                    _ => {
                        return Err(ProtocolError::MissingArgument {
                            command: line.to_string(),
                        })
                    }
                }
            }
            "your_bot" => Setting::BotName(value.to_string()),
            "your_botid" => {
                let id: usize = number(value, line)?;
                Setting::BotId(PlayerId::from_index(id).ok_or(ProtocolError::InvalidBotId(id))?)
            }
            "field_width" => Setting::FieldWidth(number(value, line)?),
            "field_height" => Setting::FieldHeight(number(value, line)?),
            _ => return Err(ProtocolError::UnknownCommand(line.to_string())),
        };
        Ok(setting)
    }
}

/// A judge session driving one Bot
pub struct Session {
    bot: Bot,
}

impl Session {
    pub fn new(bot: Bot) -> Self {
        Session { bot }
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Handles one line; returns the action to send back, if any
    pub fn handle_line(&mut self, line: &str) -> Result<Option<Action>, ProtocolError> {
        match Command::parse(line)? {
            Command::Setting(setting) => self.bot.apply_setting(setting),
            Command::UpdateRound(round) => self.bot.update_round(round),
            Command::UpdateField(field) => self.bot.update_field(&field)?,
            Command::IgnoredUpdate(update) => debug!("Ignoring update: {}", update),
            Command::ActionMove { time_bank_ms } => {
                return Ok(Some(self.bot.get_move(time_bank_ms)));
            }
        }
        Ok(None)
    }

    /// Serves lines until EOF. Bad lines are logged and skipped; only I/O
    /// failures on the judge channel end the session with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), ProtocolError> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match self.handle_line(&line) {
                Ok(Some(action)) => {
                    writeln!(output, "{}", action.as_str())?;
                    output.flush()?;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("{}", err);
                    let mut source = err.source();
                    while let Some(cause) = source {
                        warn!("  caused by: {}", cause);
                        source = cause.source();
                    }
                }
            }
        }
        Ok(())
    }
}
