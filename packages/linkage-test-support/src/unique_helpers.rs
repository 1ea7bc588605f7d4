//! Random but collision-free fixture values.
//!
//! ULIDs keep values unique across tests sharing a database; `rand` supplies
//! the filler text.

use rand::seq::IndexedRandom;
use rand::Rng;
use ulid::Ulid;

const WORDS: &[&str] = &[
    "alpha", "amber", "birch", "cobalt", "delta", "ember", "fjord", "granite", "harbor",
    "indigo", "juniper", "kestrel", "lumen", "meadow", "nectar", "orbit", "pebble", "quartz",
    "raven", "sierra", "tundra", "umber", "velvet", "willow", "zephyr",
];

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `{prefix}-{ulid}@example.test`
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

/// Lower-case url slug ending in a ulid.
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new().to_string().to_lowercase())
}

/// `count` random words joined by spaces.
pub fn words(count: usize) -> String {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| *WORDS.choose(&mut rng).unwrap_or(&"lorem"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalised sentence of `count` random words.
pub fn sentence(count: usize) -> String {
    let text = words(count.max(1));
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// UK mobile number in the `+447#########` shape.
pub fn uk_mobile_number() -> String {
    let mut rng = rand::rng();
    let digits: String = (0..9)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect();
    format!("+447{digits}")
}

/// Two upper-case ASCII letters.
pub fn country_code() -> String {
    let mut rng = rand::rng();
    (0..2)
        .map(|_| char::from(b'A' + rng.random_range(0..26u8)))
        .collect()
}
