//! Push registration types.

/// Device push token issued by the platform notification service.
#[derive(Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct PushToken(Vec<u8>);

impl PushToken {
    /// Wrap raw token bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex-encoded token.
    ///
    /// Either case is accepted and surrounding whitespace is ignored.
    pub fn from_hex(hex: &str) -> Result<Self, InvalidHex> {
        let hex = hex.trim();
        if hex.len() % 2 != 0 {
            return Err(InvalidHex::OddLength(hex.len()));
        }

        hex.as_bytes()
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                let hi = hex_value(pair[0]).ok_or(InvalidHex::InvalidDigit(i * 2))?;
                let lo = hex_value(pair[1]).ok_or(InvalidHex::InvalidDigit(i * 2 + 1))?;
                Ok((hi << 4) | lo)
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Self)
    }

    /// Get the token as a lowercase hex string (the wire form).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Raw token bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check if the token carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for PushToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PushToken({})", self.to_hex())
    }
}

impl From<Vec<u8>> for PushToken {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for PushToken {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Error parsing a hex push token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidHex {
    #[error("hex token has odd length {0}")]
    OddLength(usize),
    #[error("invalid hex digit at offset {0}")]
    InvalidDigit(usize),
}

/// Notification service the token was issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushType {
    /// Legacy binary APNs.
    #[default]
    Apns,
    /// HTTP/2 APNs, addressed by topic and environment.
    Apns2,
    /// Firebase Cloud Messaging.
    #[serde(alias = "gcm")]
    Fcm,
    /// Microsoft Push Notification Service.
    Mpns,
}

impl PushType {
    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apns => "apns",
            Self::Apns2 => "apns2",
            Self::Fcm => "gcm",
            Self::Mpns => "mpns",
        }
    }
}

impl std::fmt::Display for PushType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PushType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apns" => Ok(Self::Apns),
            "apns2" => Ok(Self::Apns2),
            "gcm" | "fcm" => Ok(Self::Fcm),
            "mpns" => Ok(Self::Mpns),
            other => Err(format!("unknown push type: {other}")),
        }
    }
}

/// APNs environment for `apns2` registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushEnvironment {
    #[default]
    Development,
    Production,
}

impl PushEnvironment {
    /// Value of the `environment` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl std::fmt::Display for PushEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PushEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" | "sandbox" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown push environment: {other}")),
        }
    }
}

/// Channels a push registration change applies to.
///
/// Converting an empty list yields [`Channels::All`], so removing an empty
/// list of channels deregisters the token everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channels {
    /// Every channel registered under the token.
    All,
    /// Specific channels. Order is kept and duplicates are not removed.
    Named(Vec<String>),
}

impl Channels {
    /// Named channels, or an empty slice for [`Channels::All`].
    pub fn names(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Named(names) => names,
        }
    }

    /// Check if this selects every channel.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<S: Into<String>> From<Vec<S>> for Channels {
    fn from(names: Vec<S>) -> Self {
        if names.is_empty() {
            Self::All
        } else {
            Self::Named(names.into_iter().map(Into::into).collect())
        }
    }
}

impl<S: Into<String> + Clone> From<&[S]> for Channels {
    fn from(names: &[S]) -> Self {
        names.to_vec().into()
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Channels {
    fn from(names: [S; N]) -> Self {
        Vec::from(names).into()
    }
}

impl<S: Into<String>> From<Option<Vec<S>>> for Channels {
    fn from(names: Option<Vec<S>>) -> Self {
        names.map_or(Self::All, Into::into)
    }
}
