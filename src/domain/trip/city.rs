//! Supported cities and the alias table used to recognise them in free text.

/// A city the planner can route to, keyed by its IATA code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct City {
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Fully qualified name used for place searches.
    pub region_name: &'static str,
    /// Lower-case names that resolve to this city, in match priority order.
    /// The trailing three-letter alias is the IATA code itself.
    pub aliases: &'static [&'static str],
}

/// Cities in table order. Matching walks this table front to back.
pub const CITIES: [City; 10] = [
    City {
        code: "BLR",
        name: "Bangalore",
        region_name: "Bangalore, India",
        aliases: &["bangalore", "bengaluru", "blr"],
    },
    City {
        code: "BOM",
        name: "Mumbai",
        region_name: "Mumbai, India",
        aliases: &["mumbai", "bombay", "bom"],
    },
    City {
        code: "DEL",
        name: "Delhi",
        region_name: "New Delhi, India",
        aliases: &["delhi", "new delhi", "del"],
    },
    City {
        code: "GOI",
        name: "Goa",
        region_name: "Goa, India",
        aliases: &["goa", "goi"],
    },
    City {
        code: "MAA",
        name: "Chennai",
        region_name: "Chennai, India",
        aliases: &["chennai", "madras", "maa"],
    },
    City {
        code: "CCU",
        name: "Kolkata",
        region_name: "Kolkata, India",
        aliases: &["kolkata", "calcutta", "ccu"],
    },
    City {
        code: "HYD",
        name: "Hyderabad",
        region_name: "Hyderabad, India",
        aliases: &["hyderabad", "hyd"],
    },
    City {
        code: "PNQ",
        name: "Pune",
        region_name: "Pune, India",
        aliases: &["pune", "pnq"],
    },
    City {
        code: "JAI",
        name: "Jaipur",
        region_name: "Jaipur, India",
        aliases: &["jaipur", "jai"],
    },
    City {
        code: "COK",
        name: "Kochi",
        region_name: "Kochi, India",
        aliases: &["kochi", "cochin", "cok"],
    },
];

impl City {
    /// Looks up a city by IATA code, case-insensitively.
    pub fn by_code(code: &str) -> Option<&'static City> {
        CITIES.iter().find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Returns the first city (table order, then alias order) mentioned in `text`.
    ///
    /// Names match as substrings; three-letter code aliases only as whole words.
    pub fn find_in(text: &str) -> Option<&'static City> {
        let lower = text.to_lowercase();
        CITIES
            .iter()
            .find(|city| city.aliases.iter().any(|alias| alias_occurs(&lower, alias)))
    }
}

fn alias_occurs(haystack: &str, alias: &str) -> bool {
    let is_code = alias.len() == 3 && alias.chars().all(|c| c.is_ascii_alphabetic());
    if !is_code {
        return haystack.contains(alias);
    }
    haystack.match_indices(alias).any(|(start, _)| {
        let end = start + alias.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}
