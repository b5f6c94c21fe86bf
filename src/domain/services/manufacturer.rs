//! # Manufacturer Lookup
//!
//! Resolves a World Manufacturer Identifier to a make name.
//!
//! Resolution order:
//!
//! 1. exact three-character WMI match
//! 2. first table entry sharing the two-character prefix
//! 3. region of origin from the first character
//! 4. [`UNKNOWN_MANUFACTURER`]
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::services::manufacturer::resolve_manufacturer;
//!
//! assert_eq!(resolve_manufacturer("1HG"), "Honda");
//! assert_eq!(resolve_manufacturer("JTH"), "Lexus");
//! assert_eq!(resolve_manufacturer("1HZ"), "Honda");
//! assert_eq!(resolve_manufacturer("9ZZ"), "Oceanian Manufacturer");
//! ```

/// Label used when nothing about the WMI is recognized.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown Manufacturer";

/// Known WMIs in lookup order. Prefix matching walks this table front to
/// back, so earlier entries win.
pub const WMI_TABLE: &[(&str, &str)] = &[
    // Honda / Acura
    ("1HG", "Honda"),
    ("1HT", "Honda"),
    ("2HG", "Honda"),
    ("3HG", "Honda"),
    ("JHM", "Honda"),
    ("19X", "Honda"),
    ("19U", "Acura"),
    ("JH4", "Acura"),
    // Toyota / Lexus
    ("4T1", "Toyota"),
    ("4T3", "Toyota"),
    ("5TD", "Toyota"),
    ("JTD", "Toyota"),
    ("JTG", "Toyota"),
    ("JTK", "Toyota"),
    ("JTL", "Toyota"),
    ("JTM", "Toyota"),
    ("JTN", "Toyota"),
    ("JTP", "Toyota"),
    ("JTR", "Toyota"),
    ("JTS", "Toyota"),
    ("JTT", "Toyota"),
    ("JTW", "Toyota"),
    ("JTX", "Toyota"),
    ("JTY", "Toyota"),
    ("JTZ", "Toyota"),
    ("JT2", "Lexus"),
    ("JTH", "Lexus"),
    ("JTJ", "Lexus"),
    // General Motors
    ("1G1", "Chevrolet"),
    ("1G6", "Cadillac"),
    ("1GC", "Chevrolet"),
    ("1GM", "Chevrolet"),
    ("2G1", "Chevrolet"),
    ("3G1", "Chevrolet"),
    ("1GT", "GMC"),
    ("3GT", "GMC"),
    ("1GB", "Chevrolet"),
    ("2GB", "Chevrolet"),
    ("3GB", "Chevrolet"),
    ("1G4", "Buick"),
    ("2G4", "Buick"),
    ("3G4", "Buick"),
    ("1G2", "Pontiac"),
    ("2G2", "Pontiac"),
    ("3G2", "Pontiac"),
    ("1G8", "Saturn"),
    ("2G8", "Saturn"),
    ("3G8", "Saturn"),
    // Ford / Lincoln
    ("1FA", "Ford"),
    ("1FB", "Ford"),
    ("1FC", "Ford"),
    ("1FD", "Ford"),
    ("1FM", "Ford"),
    ("1FT", "Ford"),
    ("1LN", "Lincoln"),
    ("5LM", "Lincoln"),
    // Chrysler / Dodge / Jeep / Ram
    ("1C3", "Chrysler"),
    ("1C4", "Chrysler"),
    ("1C6", "Chrysler"),
    ("1C8", "Chrysler"),
    ("2C3", "Chrysler"),
    ("2C4", "Chrysler"),
    ("2C8", "Chrysler"),
    ("3C3", "Chrysler"),
    ("3C4", "Chrysler"),
    ("3C6", "Chrysler"),
    ("3C8", "Chrysler"),
    ("1B3", "Dodge"),
    ("1B4", "Dodge"),
    ("1B6", "Dodge"),
    ("1B7", "Dodge"),
    ("2B3", "Dodge"),
    ("2B4", "Dodge"),
    ("2B7", "Dodge"),
    ("3B3", "Dodge"),
    ("3B4", "Dodge"),
    ("3B6", "Dodge"),
    ("3B7", "Dodge"),
    ("1J4", "Jeep"),
    ("1J8", "Jeep"),
    ("3C7", "Ram"),
    // Hyundai / Kia
    ("KMH", "Hyundai"),
    ("KM8", "Hyundai"),
    ("KNA", "Kia"),
    ("KND", "Kia"),
    // Nissan / Infiniti
    ("1N4", "Nissan"),
    ("1N6", "Nissan"),
    ("JN1", "Nissan"),
    ("JN6", "Nissan"),
    ("JN8", "Nissan"),
    ("JNA", "Infiniti"),
    ("JNK", "Infiniti"),
    ("JNR", "Infiniti"),
    // German
    ("WBA", "BMW"),
    ("WBS", "BMW"),
    ("WBX", "BMW"),
    ("4US", "BMW"),
    ("5UX", "BMW"),
    ("WDD", "Mercedes-Benz"),
    ("WDC", "Mercedes-Benz"),
    ("WDF", "Mercedes-Benz"),
    ("WAU", "Audi"),
    ("WA1", "Audi"),
    ("TRU", "Audi"),
    ("WVW", "Volkswagen"),
    ("WV1", "Volkswagen"),
    ("3VW", "Volkswagen"),
    // Volvo
    ("YV1", "Volvo"),
    ("YV4", "Volvo"),
    // Mazda
    ("JM1", "Mazda"),
    ("JM3", "Mazda"),
    ("4F2", "Mazda"),
    ("4F4", "Mazda"),
    // Mitsubishi
    ("JA3", "Mitsubishi"),
    ("JA4", "Mitsubishi"),
    ("4A3", "Mitsubishi"),
    ("4A4", "Mitsubishi"),
    // Subaru
    ("JF1", "Subaru"),
    ("JF2", "Subaru"),
    ("4S3", "Subaru"),
    ("4S4", "Subaru"),
];

/// Region of origin implied by the first WMI character.
#[must_use]
pub fn region_of_origin(first: char) -> Option<&'static str> {
    match first {
        '1'..='5' => Some("North American Manufacturer"),
        '6' | '7' | '8' | '9' => Some("Oceanian Manufacturer"),
        'A'..='H' => Some("African Manufacturer"),
        'J'..='P' => Some("Asian Manufacturer"),
        'R'..='Z' => Some("European Manufacturer"),
        _ => None,
    }
}

/// Resolves a WMI to a make or region label.
#[must_use]
pub fn resolve_manufacturer(wmi: &str) -> &'static str {
    if let Some((_, make)) = WMI_TABLE.iter().find(|(code, _)| *code == wmi) {
        return make;
    }

    let by_prefix = wmi
        .get(..2)
        .and_then(|prefix| WMI_TABLE.iter().find(|(code, _)| code.starts_with(prefix)));
    if let Some((_, make)) = by_prefix {
        return make;
    }

    wmi.chars()
        .next()
        .and_then(region_of_origin)
        .unwrap_or(UNKNOWN_MANUFACTURER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matches() {
        assert_eq!(resolve_manufacturer("1HG"), "Honda");
        assert_eq!(resolve_manufacturer("JH4"), "Acura");
        assert_eq!(resolve_manufacturer("WBA"), "BMW");
        assert_eq!(resolve_manufacturer("1FT"), "Ford");
        assert_eq!(resolve_manufacturer("KNA"), "Kia");
    }

    #[test]
    fn lexus_wmis_resolve_to_lexus() {
        assert_eq!(resolve_manufacturer("JTH"), "Lexus");
        assert_eq!(resolve_manufacturer("JTJ"), "Lexus");
        assert_eq!(resolve_manufacturer("JT2"), "Lexus");
    }

    #[test]
    fn prefix_match_uses_table_order() {
        assert_eq!(resolve_manufacturer("1FZ"), "Ford");
        assert_eq!(resolve_manufacturer("JT9"), "Toyota");
        assert_eq!(resolve_manufacturer("1GZ"), "Chevrolet");
        assert_eq!(resolve_manufacturer("WDZ"), "Mercedes-Benz");
    }

    #[test]
    fn region_fallback() {
        assert_eq!(resolve_manufacturer("5YJ"), "North American Manufacturer");
        assert_eq!(resolve_manufacturer("SAL"), "European Manufacturer");
        assert_eq!(resolve_manufacturer("LRW"), "Asian Manufacturer");
        assert_eq!(resolve_manufacturer("AAV"), "African Manufacturer");
        assert_eq!(resolve_manufacturer("6T1"), "Oceanian Manufacturer");
    }

    #[test]
    fn unknown_when_nothing_matches() {
        assert_eq!(resolve_manufacturer(""), UNKNOWN_MANUFACTURER);
        assert_eq!(resolve_manufacturer("?AB"), UNKNOWN_MANUFACTURER);
    }

    #[test]
    fn wmi_table_has_no_duplicate_codes() {
        let mut codes: Vec<&str> = WMI_TABLE.iter().map(|(code, _)| *code).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }
}
