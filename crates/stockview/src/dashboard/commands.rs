//! Command parsing for the interactive dashboard
//!
//! Plain text is treated as a company search; everything else starts with `/`.

use crate::error::{DashboardError, Result};
use chrono::NaiveDate;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search the directory by name or symbol
    Search { query: String },
    /// Pick one of the current matches by index, name or symbol
    Select { choice: String },
    /// Change the history window
    Range { start: NaiveDate, end: NaiveDate },
    /// Re-fetch and redraw the current selection
    Show,
    /// Show help
    Help,
    /// Leave the dashboard
    Exit,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        DashboardError::Command(format!("Invalid date '{raw}' (expected YYYY-MM-DD): {e}"))
    })
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(DashboardError::Command("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Search {
                query: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(DashboardError::Command("Empty command".to_string()));
        };

        match cmd.to_lowercase().as_str() {
            "search" | "s" | "find" => Ok(Command::Search {
                query: args.join(" "),
            }),
            "select" | "pick" | "sel" => {
                if args.is_empty() {
                    return Err(DashboardError::Command(
                        "Missing choice for select command".to_string(),
                    ));
                }
                Ok(Command::Select {
                    choice: args.join(" "),
                })
            }
            "range" | "r" | "dates" => match args {
                [start, end] => Ok(Command::Range {
                    start: parse_date(start)?,
                    end: parse_date(end)?,
                }),
                _ => Err(DashboardError::Command(
                    "Range requires a start and an end date".to_string(),
                )),
            },
            "show" | "refresh" => Ok(Command::Show),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(DashboardError::Command(format!("Unknown command: {other}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Data Viewer Commands
==========================

  <text>                   Search companies by name or symbol
  /search <text>           Same as typing the text
  /select <n|name|symbol>  Pick one of the listed matches
  /range <start> <end>     Set the date range (YYYY-MM-DD YYYY-MM-DD)
  /show                    Fetch the current selection again
  /help                    Show help
  /exit                    Exit

Aliases:
  /s = /search   /pick = /select   /r = /range   /q = /exit
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_search() {
        let cmd = Command::parse("  apple inc ").unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "apple inc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_search_alias() {
        let cmd = Command::parse("/s micro soft").unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                query: "micro soft".to_string()
            }
        );

        // blank query is passed through; the dashboard answers with a prompt
        let cmd = Command::parse("/search").unwrap();
        assert_eq!(cmd, Command::Search { query: String::new() });
    }

    #[test]
    fn test_parse_select() {
        let cmd = Command::parse("/select 2").unwrap();
        assert_eq!(
            cmd,
            Command::Select {
                choice: "2".to_string()
            }
        );

        let cmd = Command::parse("/pick Apple Inc").unwrap();
        assert_eq!(
            cmd,
            Command::Select {
                choice: "Apple Inc".to_string()
            }
        );

        assert!(Command::parse("/select").is_err());
    }

    #[test]
    fn test_parse_range() {
        let cmd = Command::parse("/range 2024-01-01 2024-06-30").unwrap();
        assert_eq!(
            cmd,
            Command::Range {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            }
        );
    }

    #[test]
    fn test_parse_range_errors() {
        assert!(Command::parse("/range 2024-01-01").is_err());
        assert!(Command::parse("/r 2024-13-01 2024-12-01").is_err());
        assert!(Command::parse("/r 01/01/2024 2024-12-01").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(Command::parse("/show").unwrap(), Command::Show);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/QUIT").unwrap(), Command::Exit);
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/bogus").is_err());
    }
}
