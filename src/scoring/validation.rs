use super::config::ScoringConfig;

/// Largest value accepted for any entry in the points table.
pub const MAX_POINTS: i64 = 1_000_000;

/// Validate the points table at startup: every value in 0..=MAX_POINTS.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let fields = [
        ("rule", config.rule),
        ("inquiry_filed", config.inquiry_filed),
        ("guilty_penalty", config.guilty_penalty),
        ("daily_mvp", config.daily_mvp),
        ("quote_of_the_trip", config.quote_of_the_trip),
        ("photo", config.photo),
        ("photo_like", config.photo_like),
    ];
    for (name, value) in fields {
        check_points(&mut errors, &format!("scoring.{}", name), value);
    }

    if let Some(ref drinks) = config.drinks {
        check_points(&mut errors, "scoring.drinks.guinness", drinks.guinness);
        check_points(&mut errors, "scoring.drinks.jameson", drinks.jameson);
        check_points(&mut errors, "scoring.drinks.other", drinks.other);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_points(errors: &mut Vec<String>, path: &str, value: Option<i64>) {
    if let Some(v) = value {
        if v < 0 {
            errors.push(format!(
                "{}: must be non-negative (got {}); penalties are written as magnitudes",
                path, v
            ));
        } else if v > MAX_POINTS {
            errors.push(format!("{}: must be at most {} (got {})", path, MAX_POINTS, v));
        }
    }
}
