// src/domain/address.rs

use regex::Regex;
use std::fmt;

/// `<house_number> <street>, <city>, <state> <zip>`
const ADDRESS_PATTERN: &str = r"^(?P<house_number>\d+) (?P<street>[\w\s]+), (?P<city>[\w\s]+), (?P<state>\w{2}) (?P<zip_code>\d+)$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub house_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl ParsedAddress {
    pub fn street_address(&self) -> String {
        format!("{} {}", self.house_number, self.street)
    }
}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}, {} {}",
            self.house_number, self.street, self.city, self.state, self.zip_code
        )
    }
}

/// Compiled form of the only address shape listings are accepted in.
#[derive(Debug, Clone)]
pub struct AddressGrammar {
    re: Regex,
}

impl AddressGrammar {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            re: Regex::new(ADDRESS_PATTERN)?,
        })
    }

    pub fn parse(&self, address: &str) -> Option<ParsedAddress> {
        let caps = self.re.captures(address)?;
        Some(ParsedAddress {
            house_number: caps["house_number"].to_string(),
            street: caps["street"].to_string(),
            city: caps["city"].to_string(),
            state: caps["state"].to_string(),
            zip_code: caps["zip_code"].to_string(),
        })
    }
}
