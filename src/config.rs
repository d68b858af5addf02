use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub platform_cache: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let db_max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse::<u32>()
                .with_context(|| format!("invalid DB_MAX_CONNECTIONS: {}", value))?,
            Err(_) => 5,
        };
        let platform_cache = std::env::var("PLATFORM_CACHE")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);

        Ok(Config {
            database_url,
            bind_addr,
            db_max_connections,
            platform_cache,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        let cases = vec![
            ("true", true),
            ("1", true),
            ("yes", true),
            ("false", false),
            (" OFF ", false),
            ("0", false),
            ("no", false),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_flag(input), expected, "Failed on input: {}", input);
        }
    }
}
