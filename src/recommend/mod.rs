//! Shopper-facing advice derived from a prediction.

/// Discount above which a deal is called excellent.
pub const EXCELLENT_DISCOUNT: f32 = 30.0;
/// Discount above which a deal is called good.
pub const GOOD_DISCOUNT: f32 = 20.0;
/// Budget above which the high-value note is added.
pub const HIGH_VALUE_BUDGET: f32 = 10_000.0;

/// Builds the advice list for a predicted deal.
///
/// The first two entries reflect the discount tier, a high budget adds
/// a financing note, and two generic reminders close the list. The
/// ordering is deterministic.
#[must_use]
pub fn recommend(discount: f32, platform: &str, category: &str, budget: f32) -> Vec<String> {
    let mut notes = Vec::with_capacity(5);

    if discount > EXCELLENT_DISCOUNT {
        notes.push(format!(
            "Excellent! {platform} offers great discounts on {category}"
        ));
        notes.push(format!(
            "You can save up to {discount:.0}% - perfect time to buy!"
        ));
    } else if discount > GOOD_DISCOUNT {
        notes.push(format!(
            "Good deal! {platform} has decent discounts on {category}"
        ));
        notes.push(format!("Expected savings around {discount:.0}%"));
    } else {
        notes.push(format!("Moderate discounts on {platform} for {category}"));
        notes.push("Consider waiting for sales or checking other platforms".to_string());
    }

    if budget > HIGH_VALUE_BUDGET {
        notes.push("High-value purchase - look for bank offers and EMI options".to_string());
    }

    notes.push("Compare prices across platforms before purchasing".to_string());
    notes.push("Check product ratings and reviews".to_string());

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excellent_tier() {
        let notes = recommend(35.0, "Amazon", "Electronics", 5000.0);
        assert_eq!(notes.len(), 4);
        assert!(notes[0].starts_with("Excellent!"));
        assert!(notes[0].contains("Amazon"));
        assert!(notes[0].contains("Electronics"));
        assert!(notes[1].contains("35%"));
    }

    #[test]
    fn test_good_tier() {
        let notes = recommend(25.0, "Flipkart", "Books", 5000.0);
        assert!(notes[0].starts_with("Good deal!"));
        assert!(notes[0].contains("Flipkart"));
        assert!(notes[1].contains("25%"));
    }

    #[test]
    fn test_moderate_tier() {
        let notes = recommend(10.0, "Myntra", "Fashion", 5000.0);
        assert!(notes[0].contains("Moderate discounts on Myntra for Fashion"));
        assert!(notes[1].contains("waiting for sales"));
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        // Exactly 30 is good, exactly 20 is moderate
        assert!(recommend(30.0, "X", "Y", 100.0)[0].starts_with("Good deal!"));
        assert!(recommend(20.0, "X", "Y", 100.0)[0].contains("Moderate"));
    }

    #[test]
    fn test_high_value_note() {
        let notes = recommend(25.0, "Amazon", "Electronics", 12_000.0);
        assert_eq!(notes.len(), 5);
        assert!(notes[2].contains("High-value purchase"));

        // Exactly at the threshold stays a regular purchase
        let notes = recommend(25.0, "Amazon", "Electronics", 10_000.0);
        assert_eq!(notes.len(), 4);
    }

    #[test]
    fn test_generic_reminders_always_last() {
        for budget in [500.0, 50_000.0] {
            let notes = recommend(5.0, "Amazon", "Books", budget);
            let n = notes.len();
            assert!(notes[n - 2].contains("Compare prices"));
            assert!(notes[n - 1].contains("ratings and reviews"));
        }
    }
}
