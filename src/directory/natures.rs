use rand::Rng;

/// Suffixes appended to a catalog name to build a display identity.
pub const NATURES: [&str; 25] = [
    "Hardy", "Lonely", "Brave", "Adamant", "Naughty", "Bold", "Docile", "Relaxed", "Impish",
    "Lax", "Timid", "Hasty", "Serious", "Jolly", "Naive", "Modest", "Mild", "Quiet", "Bashful",
    "Rash", "Calm", "Gentle", "Sassy", "Careful", "Quirky",
];

pub fn random_nature<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    NATURES[rng.random_range(0..NATURES.len())]
}
