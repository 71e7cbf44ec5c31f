use std::sync::LazyLock;

use regex::Regex;

pub const INVALID_FULL_NAME_MESSAGE: &str = "Nom complet invalide.";
pub const MISSING_MEMBER_NUMBER_MESSAGE: &str = "Numéro de membre requis.";
pub const INVALID_MEMBER_NUMBER_MESSAGE: &str = "Format du numéro de membre invalide.";
pub const FEE_NOT_ACKNOWLEDGED_MESSAGE: &str = "Tu dois confirmer que les frais sont compris.";
pub const CAPACITY_REACHED_MESSAGE: &str = "Les inscriptions sont maintenant complètes.";

static MEMBER_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9\- ]{3,30}$").expect("member number pattern is a valid regex")
});

pub fn validate_full_name(name: Option<&str>) -> Vec<String> {
    match name {
        Some(name) if name.trim().chars().count() >= 3 => Vec::new(),
        _ => vec![INVALID_FULL_NAME_MESSAGE.to_string()],
    }
}

pub fn validate_member_number(number: Option<&str>) -> Vec<String> {
    let Some(number) = number.filter(|n| !n.is_empty()) else {
        return vec![MISSING_MEMBER_NUMBER_MESSAGE.to_string()];
    };
    if MEMBER_NUMBER_PATTERN.is_match(number.trim()) {
        Vec::new()
    } else {
        vec![INVALID_MEMBER_NUMBER_MESSAGE.to_string()]
    }
}

pub fn validate_fee_ack(acknowledged: bool) -> Vec<String> {
    if acknowledged {
        Vec::new()
    } else {
        vec![FEE_NOT_ACKNOWLEDGED_MESSAGE.to_string()]
    }
}

/// All three checks, messages concatenated in field order.
pub fn validate_submission(
    full_name: Option<&str>,
    member_number: Option<&str>,
    fee_acknowledged: bool,
) -> Vec<String> {
    let mut errors = validate_full_name(full_name);
    errors.extend(validate_member_number(member_number));
    errors.extend(validate_fee_ack(fee_acknowledged));
    errors
}
