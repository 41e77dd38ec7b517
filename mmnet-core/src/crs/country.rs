/// country hint meaning "no particular country"
pub const GLOBAL_COUNTRY: &str = "global";

/// (english name, ISO 3166 alpha-2 code, default projected CRS)
static COUNTRY_DEFAULT_CRS: [(&str, &str, &str); 13] = [
    ("australia", "AU", "EPSG:3112"),
    ("belgium", "BE", "EPSG:3812"),
    ("denmark", "DK", "EPSG:25832"),
    ("france", "FR", "EPSG:2154"),
    ("germany", "DE", "EPSG:25832"),
    ("netherlands", "NL", "EPSG:25831"),
    ("new zealand", "NZ", "EPSG:2193"),
    ("norway", "NO", "EPSG:25833"),
    ("singapore", "SG", "EPSG:3414"),
    ("spain", "ES", "EPSG:25830"),
    ("sweden", "SE", "EPSG:3006"),
    ("united kingdom", "GB", "EPSG:32630"),
    ("uk", "GB", "EPSG:32630"),
];

/// default projected CRS code for a country, matched case-insensitively on either the
/// english name or the alpha-2 code. `None` for unknown countries and for
/// [GLOBAL_COUNTRY].
pub fn default_crs_code_for_country(country: &str) -> Option<&'static str> {
    find_country(country).map(|(_, _, code)| *code)
}

/// ISO 3166 alpha-2 code of a known country given by name or code
pub fn country_code(country: &str) -> Option<&'static str> {
    find_country(country).map(|(_, alpha2, _)| *alpha2)
}

fn find_country(country: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    let country = country.trim();
    if country.is_empty() || country.eq_ignore_ascii_case(GLOBAL_COUNTRY) {
        return None;
    }
    COUNTRY_DEFAULT_CRS.iter().find(|(name, alpha2, _)| {
        name.eq_ignore_ascii_case(country) || alpha2.eq_ignore_ascii_case(country)
    })
}
