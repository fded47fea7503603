//! Static lookup tables used by the recommendation matcher.

/// Symptom keyword to canonical product names.
///
/// Canonical names are compared against catalog titles by substring
/// containment, so "Iron Supplements" still finds "Iron Supplement".
pub static SYMPTOM_MAPPING: &[(&str, &[&str])] = &[
    // Energy & fatigue
    ("tired", &["Vitamin B Complex", "Iron Supplements", "Multivitamin"]),
    ("fatigue", &["Iron Supplement", "Vitamin B Complex", "Multivitamin"]),
    ("energy", &["Vitamin B Complex", "Iron Supplement", "Multivitamin"]),
    ("weak", &["Iron Supplement", "Vitamin B Complex", "Multivitamin"]),
    ("exhausted", &["Iron Supplement", "Vitamin B Complex"]),
    // Bone & joint
    ("bones", &["Calcium + Vitamin D3", "Glucosamine Joint Support"]),
    ("joint", &["Glucosamine Joint Support", "Turmeric Curcumin"]),
    ("arthritis", &["Glucosamine Joint Support", "Turmeric Curcumin"]),
    ("osteoporosis", &["Calcium + Vitamin D3"]),
    ("fracture", &["Calcium + Vitamin D3"]),
    // Hair & skin
    ("hair", &["Multivitamin", "Collagen Skin Health"]),
    ("skin", &["Collagen Skin Health", "Multivitamin"]),
    ("wrinkles", &["Collagen Skin Health"]),
    ("aging", &["Collagen Skin Health", "Multivitamin"]),
    // Sleep & stress
    ("sleep", &["Sleep Support Melatonin", "Magnesium Glycinate"]),
    ("insomnia", &["Sleep Support Melatonin", "Magnesium Glycinate"]),
    ("stress", &["Magnesium Glycinate", "Sleep Support Melatonin"]),
    ("anxiety", &["Magnesium Glycinate"]),
    // Digestive
    ("stomach", &["Probiotic Digestive Health"]),
    ("digestion", &["Probiotic Digestive Health"]),
    ("gut", &["Probiotic Digestive Health"]),
    ("bloating", &["Probiotic Digestive Health"]),
    // Immune
    ("cold", &["Immune System Booster"]),
    ("flu", &["Immune System Booster"]),
    ("immunity", &["Immune System Booster", "Multivitamin"]),
    ("infection", &["Immune System Booster"]),
    // Heart & circulation
    ("heart", &["Omega-3 Fish Oil"]),
    ("cardiovascular", &["Omega-3 Fish Oil"]),
    ("cholesterol", &["Omega-3 Fish Oil"]),
    // Pain & inflammation
    ("pain", &["Turmeric Curcumin", "Glucosamine Joint Support"]),
    ("inflammation", &["Turmeric Curcumin", "Omega-3 Fish Oil"]),
    ("swelling", &["Turmeric Curcumin"]),
    // Blood
    ("anemia", &["Iron Supplement"]),
    ("blood", &["Iron Supplement"]),
    ("hemoglobin", &["Iron Supplement"]),
    // Muscle
    ("muscle", &["Magnesium Glycinate", "Multivitamin"]),
    ("cramps", &["Magnesium Glycinate"]),
    ("spasms", &["Magnesium Glycinate"]),
];

/// Tag substring to display category, scanned in order.
pub static CATEGORY_MAP: &[(&str, &str)] = &[
    ("vitamin", "Vitamins"),
    ("mineral", "Minerals"),
    ("supplement", "Supplements"),
    ("probiotic", "Digestive Health"),
    ("omega", "Heart Health"),
    ("joint", "Joint Support"),
    ("sleep", "Sleep Support"),
    ("immune", "Immune Support"),
];

pub const DEFAULT_CATEGORY: &str = "Health Supplements";

/// Tags that count as a recommendation when they also appear in an AI reply.
pub static RESPONSE_TAG_WHITELIST: &[&str] = &[
    "vitamin c",
    "zinc",
    "iron",
    "calcium",
    "omega",
    "probiotic",
    "melatonin",
    "magnesium",
    "collagen",
    "turmeric",
    "immune",
];

pub static FOLLOW_UP_QUESTIONS: &[&str] = &[
    "How long have you been experiencing these symptoms?",
    "Are these symptoms constant or do they come and go?",
    "Have you noticed any triggers that make these symptoms worse?",
    "Are you currently taking any medications or supplements?",
    "Do these symptoms affect your daily activities?",
];

/// Look up the canonical product names for a keyword. Exact, case-sensitive.
pub fn symptom_products(keyword: &str) -> Option<&'static [&'static str]> {
    SYMPTOM_MAPPING
        .iter()
        .find(|(key, _)| *key == keyword)
        .map(|(_, products)| *products)
}
