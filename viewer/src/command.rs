//! Interactive command parsing.

use dailyrate_common::CurrencyCode;
use dailyrate_fx::{Action, Multiplier};

pub const HELP: &str = "\
Commands:
  base <code>          show rates against another currency
  mult <n|auto>        multiplier: 1, 10, 100, 1000, 10000 or auto
  pair <from> <to>     set the conversion pair
  swap                 swap the conversion pair
  amount <value>       convert an amount (a bare number works too)
  show                 redraw
  help                 this text
  quit                 exit";

/// A parsed line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Action),
    Show,
    Help,
    Quit,
}

fn code(word: Option<&str>) -> Result<CurrencyCode, String> {
    word.ok_or_else(|| "missing currency code".to_string())?
        .parse()
        .map_err(|e| format!("{}", e))
}

/// Parse one line of input.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let mut words = line.split_whitespace();

    let Some(head) = words.next() else {
        return Ok(Command::Show);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "base" => Command::Dispatch(Action::SelectBase(code(words.next())?)),
        "mult" | "multiplier" => {
            let multiplier = match words.next() {
                None | Some("auto") => None,
                Some(value) => Some(value.parse::<Multiplier>()?),
            };
            Command::Dispatch(Action::SetMultiplier(multiplier))
        }
        "pair" => {
            let from = code(words.next())?;
            let to = code(words.next())?;
            Command::Dispatch(Action::SetPair { from, to })
        }
        "swap" => Command::Dispatch(Action::SwapPair),
        "amount" => Command::Dispatch(Action::SetAmount(words.collect::<Vec<_>>().join(""))),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ if head.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-') => {
            Command::Dispatch(Action::SetAmount(line.to_string()))
        }
        other => return Err(format!("unknown command: {}", other)),
    };

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base() {
        assert_eq!(
            parse_command("base USD").unwrap(),
            Command::Dispatch(Action::SelectBase(CurrencyCode::Usd))
        );
        assert!(parse_command("base xyz").is_err());
        assert!(parse_command("base").is_err());
    }

    #[test]
    fn test_parse_multiplier() {
        assert_eq!(
            parse_command("mult 100").unwrap(),
            Command::Dispatch(Action::SetMultiplier(Some(Multiplier::Hundred)))
        );
        assert_eq!(
            parse_command("mult auto").unwrap(),
            Command::Dispatch(Action::SetMultiplier(None))
        );
        assert!(parse_command("mult 3").is_err());
    }

    #[test]
    fn test_parse_pair_and_amount() {
        assert_eq!(
            parse_command("pair usd eur").unwrap(),
            Command::Dispatch(Action::SetPair {
                from: CurrencyCode::Usd,
                to: CurrencyCode::Eur
            })
        );
        assert_eq!(
            parse_command("amount 1,000").unwrap(),
            Command::Dispatch(Action::SetAmount("1,000".to_string()))
        );
        assert_eq!(
            parse_command(" 250.5 ").unwrap(),
            Command::Dispatch(Action::SetAmount("250.5".to_string()))
        );
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(parse_command("").unwrap(), Command::Show);
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("QUIT").unwrap(), Command::Quit);
        assert!(parse_command("frobnicate").is_err());
    }
}
