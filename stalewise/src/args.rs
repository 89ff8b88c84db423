use clap::Parser;
use http::Method;

/// Where to read the raw response head from.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(String),
}

/// Inspect how a response would be cached and served.
#[derive(Debug, Parser)]
#[command(name = "stalewise")]
pub struct Args {
    /// Config file (TOML); missing file means defaults
    #[arg(short, long, default_value = "stalewise.toml")]
    pub config: String,

    /// Request method the response answered
    #[arg(short, long, default_value = "GET", value_parser = parse_method)]
    pub method: Method,

    /// Raw HTTP/1.x response head, or "-" for stdin
    pub input: String,
}

impl Args {
    pub fn source(&self) -> Input {
        if self.input == "-" {
            Input::Stdin
        } else {
            Input::File(self.input.clone())
        }
    }
}

fn parse_method(raw: &str) -> Result<Method, String> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid method '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::{Args, Input};
    use clap::Parser;
    use http::Method;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["stalewise", "resp.txt"]).expect("valid args");
        assert_eq!(args.config, "stalewise.toml");
        assert_eq!(args.method, Method::GET);
        assert_eq!(args.source(), Input::File("resp.txt".into()));
    }

    #[test]
    fn flags_and_stdin() {
        let args = Args::try_parse_from(["stalewise", "--config", "alt.toml", "-m", "head", "-"])
            .expect("valid args");
        assert_eq!(args.config, "alt.toml");
        assert_eq!(args.method, Method::HEAD);
        assert_eq!(args.source(), Input::Stdin);
    }

    #[test]
    fn rejects_bad_invocations() {
        assert!(Args::try_parse_from(["stalewise"]).is_err());
        assert!(Args::try_parse_from(["stalewise", "--verbose", "x"]).is_err());
        assert!(Args::try_parse_from(["stalewise", "a", "b"]).is_err());
        assert!(Args::try_parse_from(["stalewise", "--config"]).is_err());
        assert!(Args::try_parse_from(["stalewise", "-m", "GE T", "x"]).is_err());
    }
}
