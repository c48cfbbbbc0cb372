//! MWS marketplaces: endpoint hosts and marketplace identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported MWS marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Ca,
    Mx,
    Br,
    Uk,
    De,
    Fr,
    Es,
    It,
    Nl,
    Se,
    Pl,
    In,
    Jp,
    Au,
}

impl Region {
    /// Returns the MWS endpoint host for this marketplace.
    pub fn mws_host(&self) -> &'static str {
        match self {
            Region::Us | Region::Br => "mws.amazonservices.com",
            Region::Ca => "mws.amazonservices.ca",
            Region::Mx => "mws.amazonservices.com.mx",
            Region::Uk
            | Region::De
            | Region::Fr
            | Region::Es
            | Region::It
            | Region::Nl
            | Region::Se
            | Region::Pl => "mws-eu.amazonservices.com",
            Region::In => "mws.amazonservices.in",
            Region::Jp => "mws.amazonservices.jp",
            Region::Au => "mws.amazonservices.com.au",
        }
    }

    /// Returns the HTTPS base URL of the MWS endpoint.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.mws_host())
    }

    /// Returns the default marketplace id for this region.
    pub fn marketplace_id(&self) -> &'static str {
        match self {
            Region::Us => "ATVPDKIKX0DER",
            Region::Ca => "A2EUQ1WTGCTBG2",
            Region::Mx => "A1AM78C64UM0Y8",
            Region::Br => "A2Q3Y263D00KWC",
            Region::Uk => "A1F83G8C2ARO7P",
            Region::De => "A1PA6795UKMFR9",
            Region::Fr => "A13V1IB3VIYZZH",
            Region::Es => "A1RKKUPIHCS9HS",
            Region::It => "APJ6JRA9NG5V4",
            Region::Nl => "A1805IZSGTT6HS",
            Region::Se => "A2NODRKZP88ZB9",
            Region::Pl => "A1C3SOZRARQ6R3",
            Region::In => "A21TJRUUN4KGV",
            Region::Jp => "A1VC38T7YXB528",
            Region::Au => "A39IBJ37TRP1C6",
        }
    }

    /// Returns all supported regions.
    pub fn all() -> &'static [Region] {
        &[
            Region::Us,
            Region::Ca,
            Region::Mx,
            Region::Br,
            Region::Uk,
            Region::De,
            Region::Fr,
            Region::Es,
            Region::It,
            Region::Nl,
            Region::Se,
            Region::Pl,
            Region::In,
            Region::Jp,
            Region::Au,
        ]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Region::Us => "us",
            Region::Ca => "ca",
            Region::Mx => "mx",
            Region::Br => "br",
            Region::Uk => "uk",
            Region::De => "de",
            Region::Fr => "fr",
            Region::Es => "es",
            Region::It => "it",
            Region::Nl => "nl",
            Region::Se => "se",
            Region::Pl => "pl",
            Region::In => "in",
            Region::Jp => "jp",
            Region::Au => "au",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Region::Us),
            "ca" | "canada" => Ok(Region::Ca),
            "mx" | "mexico" => Ok(Region::Mx),
            "br" | "brazil" => Ok(Region::Br),
            "uk" | "gb" | "united kingdom" => Ok(Region::Uk),
            "de" | "germany" => Ok(Region::De),
            "fr" | "france" => Ok(Region::Fr),
            "es" | "spain" => Ok(Region::Es),
            "it" | "italy" => Ok(Region::It),
            "nl" | "netherlands" => Ok(Region::Nl),
            "se" | "sweden" => Ok(Region::Se),
            "pl" | "poland" => Ok(Region::Pl),
            "in" | "india" => Ok(Region::In),
            "jp" | "japan" => Ok(Region::Jp),
            "au" | "australia" => Ok(Region::Au),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionParseError(String);

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown region '{}'. Valid regions: us, ca, mx, br, uk, de, fr, es, it, nl, se, pl, in, jp, au",
            self.0
        )
    }
}

impl std::error::Error for RegionParseError {}
