use crate::action::Action;
use crate::config::COMMANDS;
use crate::router::View;

/// Commands whose name starts with the typed prefix, while no argument has
/// been typed yet.
pub fn filtered_commands(input: &str) -> Vec<(&'static str, &'static str)> {
    let Some(prefix) = input.strip_prefix('/') else {
        return vec![];
    };
    if prefix.contains(' ') {
        return vec![];
    }
    COMMANDS
        .iter()
        .filter(|(cmd, _)| cmd[1..].starts_with(prefix))
        .copied()
        .collect()
}

pub struct CommandParser;

impl CommandParser {
    pub fn is_command(input: &str) -> bool {
        input.trim_start().starts_with('/')
    }

    pub fn parse(input: &str) -> Result<Action, String> {
        let input = input.trim();
        if !input.starts_with('/') {
            return Err("Not a command".to_string());
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let args = args.trim();

        match cmd {
            "/help" => Ok(Action::Help),
            "/goto" => {
                if args.is_empty() {
                    return Err("Usage: /goto <view>\n  Example: /goto projects".to_string());
                }
                View::parse(&args.to_lowercase())
                    .map(Action::Goto)
                    .ok_or_else(|| format!("Unknown view: {}", args))
            }
            "/theme" => Ok(Action::ToggleTheme),
            "/filter" => {
                if args.is_empty() {
                    Ok(Action::Filter(None))
                } else {
                    Ok(Action::Filter(Some(args.to_string())))
                }
            }
            "/quit" => Ok(Action::Quit),
            _ => Err(format!("Unknown command: {}. Type /help for available commands.", cmd)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_commands() {
        assert_eq!(CommandParser::parse("/help"), Ok(Action::Help));
        assert_eq!(CommandParser::parse("  /theme "), Ok(Action::ToggleTheme));
        assert_eq!(CommandParser::parse("/goto Journey"), Ok(Action::Goto(View::Journey)));
        assert_eq!(CommandParser::parse("/goto #contact"), Ok(Action::Goto(View::Contact)));
        assert_eq!(
            CommandParser::parse("/filter React Native"),
            Ok(Action::Filter(Some("React Native".to_string())))
        );
        assert_eq!(CommandParser::parse("/filter"), Ok(Action::Filter(None)));
        assert_eq!(CommandParser::parse("/quit"), Ok(Action::Quit));
    }

    #[test]
    fn test_filtered_commands() {
        let names: Vec<&str> = filtered_commands("/").iter().map(|(c, _)| *c).collect();
        assert_eq!(names.len(), COMMANDS.len());
        let names: Vec<&str> = filtered_commands("/th").iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["/theme"]);
        assert!(filtered_commands("/goto ").is_empty());
        assert!(filtered_commands("hello").is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(CommandParser::parse("hello").is_err());
        assert!(CommandParser::parse("/goto").is_err());
        assert!(CommandParser::parse("/goto nowhere").unwrap_err().contains("nowhere"));
        assert!(CommandParser::parse("/clear").unwrap_err().starts_with("Unknown command"));
    }
}
