use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// One signing secret and the lifetime of tokens signed with it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub access: TokenConfig,
    pub refresh: TokenConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            access: TokenConfig {
                secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
                ttl: parse_expiration(
                    &std::env::var("JWT_EXPIRATION_TIME").unwrap_or_else(|_| "3600s".into()),
                )
                .context("JWT_EXPIRATION_TIME")?,
            },
            refresh: TokenConfig {
                secret: std::env::var("JWT_REFRESH_TOKEN_SECRET")
                    .context("JWT_REFRESH_TOKEN_SECRET is not set")?,
                ttl: parse_expiration(
                    &std::env::var("JWT_REFRESH_TOKEN_EXPIRATION_TIME")
                        .unwrap_or_else(|_| "86400s".into()),
                )
                .context("JWT_REFRESH_TOKEN_EXPIRATION_TIME")?,
            },
        };
        jwt.validate()?;

        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url,
            jwt,
            host,
            port,
        })
    }
}

impl JwtConfig {
    /// Access and refresh tokens must never verify under each other's key.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.access.secret.is_empty(), "access token secret is empty");
        anyhow::ensure!(!self.refresh.secret.is_empty(), "refresh token secret is empty");
        anyhow::ensure!(
            self.access.secret != self.refresh.secret,
            "access and refresh tokens must use different secrets"
        );
        Ok(())
    }
}

/// Longest accepted token lifetime, ten years.
pub const MAX_EXPIRATION: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

pub fn parse_port(raw: &str) -> anyhow::Result<u16> {
    raw.trim()
        .parse::<u16>()
        .with_context(|| format!("APP_PORT {raw:?} is not a valid port"))
}

/// Parses lifetimes like `3600`, `3600s`, `15m`, `12h` or `14d`.
pub fn parse_expiration(raw: &str) -> anyhow::Result<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let value: u64 = digits
        .parse()
        .with_context(|| format!("invalid expiration {raw:?}"))?;
    let multiplier: u64 = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 60 * 60 * 24,
        other => anyhow::bail!("unknown expiration unit {other:?} in {raw:?}"),
    };
    let secs = value
        .checked_mul(multiplier)
        .with_context(|| format!("expiration {raw:?} is too large"))?;
    anyhow::ensure!(secs > 0, "expiration must be positive");
    let ttl = Duration::from_secs(secs);
    anyhow::ensure!(
        ttl <= MAX_EXPIRATION,
        "expiration {raw:?} exceeds the maximum of {} days",
        MAX_EXPIRATION.as_secs() / 86400
    );
    Ok(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(access: &str, refresh: &str) -> JwtConfig {
        JwtConfig {
            access: TokenConfig {
                secret: access.into(),
                ttl: Duration::from_secs(60),
            },
            refresh: TokenConfig {
                secret: refresh.into(),
                ttl: Duration::from_secs(600),
            },
        }
    }

    #[test]
    fn parses_expiration_units() {
        assert_eq!(parse_expiration("3600").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_expiration("3600s").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_expiration("15m").unwrap(), Duration::from_secs(900));
        assert_eq!(parse_expiration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_expiration(" 1d ").unwrap(), Duration::from_secs(86400));
    }

    #[test]
    fn rejects_bad_expiration() {
        assert!(parse_expiration("").is_err());
        assert!(parse_expiration("0s").is_err());
        assert!(parse_expiration("abc").is_err());
        assert!(parse_expiration("10w").is_err());
        assert!(parse_expiration("-5s").is_err());
        assert!(parse_expiration("300000000000000d").is_err());
        assert!(parse_expiration("100000000000000s").is_err());
        assert!(parse_expiration("99999999999999999999").is_err());
    }

    #[test]
    fn accepts_expiration_up_to_maximum() {
        assert_eq!(parse_expiration("3650d").unwrap(), MAX_EXPIRATION);
        assert!(parse_expiration("3651d").is_err());
    }

    #[test]
    fn rejects_bad_port() {
        assert_eq!(parse_port("8080").unwrap(), 8080);
        assert_eq!(parse_port(" 3000 ").unwrap(), 3000);
        assert!(parse_port("http").is_err());
        assert!(parse_port("70000").is_err());
        assert!(parse_port("").is_err());
    }

    #[test]
    fn rejects_shared_secret() {
        let err = jwt("same", "same").validate().unwrap_err();
        assert!(err.to_string().contains("different secrets"));
        assert!(jwt("", "refresh").validate().is_err());
        assert!(jwt("access", "refresh").validate().is_ok());
    }
}
