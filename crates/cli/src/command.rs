//! Parsing of terminal input lines.
//!
//! Plain text replaces the search query. Lines starting with `:` are
//! commands.

use anyhow::{anyhow, bail, Result};

use motionquest_core::{MovieId, SortDirection, SortKey};

pub const HELP: &str = "\
Type to search. Commands:
  :clear             clear the query
  :fav <id>          toggle a favorite
  :favs [on|off]     show only favorites (toggles without argument)
  :sort rating|year  choose the sort key
  :dir [asc|desc]    choose the sort direction (toggles without argument)
  :open <id>         show movie details
  :close, :esc       close the details
  :stats             print metrics
  :help              show this help
  :quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    Clear,
    ToggleFavorite(MovieId),
    /// `None` toggles.
    FavoritesOnly(Option<bool>),
    Sort(SortKey),
    /// `None` toggles.
    Direction(Option<SortDirection>),
    Open(MovieId),
    Close,
    Stats,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let Some(rest) = line.trim_start().strip_prefix(':') else {
            return Ok(Command::Query(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            bail!("too many arguments for :{}", name);
        }

        let command = match (name, arg) {
            ("clear", None) => Command::Clear,
            ("fav", Some(id)) => Command::ToggleFavorite(parse_id(id)?),
            ("favs", None) => Command::FavoritesOnly(None),
            ("favs", Some("on")) => Command::FavoritesOnly(Some(true)),
            ("favs", Some("off")) => Command::FavoritesOnly(Some(false)),
            ("sort", Some(key)) => Command::Sort(key.parse::<SortKey>().map_err(|e| anyhow!(e))?),
            ("dir", None) => Command::Direction(None),
            ("dir", Some(dir)) => Command::Direction(Some(
                dir.parse::<SortDirection>().map_err(|e| anyhow!(e))?,
            )),
            ("open", Some(id)) => Command::Open(parse_id(id)?),
            ("close" | "esc", None) => Command::Close,
            ("stats", None) => Command::Stats,
            ("help", None) => Command::Help,
            ("quit" | "q", None) => Command::Quit,
            _ => bail!("unknown command ':{}' (try :help)", rest.trim()),
        };

        Ok(command)
    }
}

fn parse_id(raw: &str) -> Result<MovieId> {
    raw.parse()
        .map_err(|_| anyhow!("'{}' is not a movie id", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_query_verbatim() {
        assert_eq!(
            Command::parse("  the matrix ").unwrap(),
            Command::Query("  the matrix ".to_string())
        );
        assert_eq!(Command::parse("").unwrap(), Command::Query(String::new()));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            Command::parse(":fav 603").unwrap(),
            Command::ToggleFavorite(603)
        );
        assert_eq!(Command::parse(":open 42").unwrap(), Command::Open(42));
        assert_eq!(
            Command::parse(":sort year").unwrap(),
            Command::Sort(SortKey::Year)
        );
        assert_eq!(
            Command::parse(":dir asc").unwrap(),
            Command::Direction(Some(SortDirection::Ascending))
        );
        assert_eq!(
            Command::parse(":favs on").unwrap(),
            Command::FavoritesOnly(Some(true))
        );
    }

    #[test]
    fn test_toggles_without_arguments() {
        assert_eq!(Command::parse(":dir").unwrap(), Command::Direction(None));
        assert_eq!(Command::parse(":favs").unwrap(), Command::FavoritesOnly(None));
    }

    #[test]
    fn test_close_aliases() {
        assert_eq!(Command::parse(":close").unwrap(), Command::Close);
        assert_eq!(Command::parse(":esc").unwrap(), Command::Close);
    }

    #[test]
    fn test_invalid_commands() {
        assert!(Command::parse(":fav").is_err());
        assert!(Command::parse(":fav abc").is_err());
        assert!(Command::parse(":sort title").is_err());
        assert!(Command::parse(":favs maybe").is_err());
        assert!(Command::parse(":open 1 2").is_err());
        assert!(Command::parse(":nope").is_err());
    }
}
