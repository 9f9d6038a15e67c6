/// Countries offered by the interactive picker.
pub const COUNTRIES: &[&str] = &[
    "Argentina",
    "Australia",
    "Austria",
    "Belgium",
    "Brazil",
    "Canada",
    "Chile",
    "China",
    "Colombia",
    "Denmark",
    "Egypt",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "India",
    "Indonesia",
    "Ireland",
    "Italy",
    "Japan",
    "Kenya",
    "Mexico",
    "Morocco",
    "Netherlands",
    "New Zealand",
    "Nigeria",
    "Norway",
    "Peru",
    "Poland",
    "Portugal",
    "South Africa",
    "South Korea",
    "Spain",
    "Sweden",
    "Switzerland",
    "Thailand",
    "Turkey",
    "Ukraine",
    "United Kingdom",
    "United States",
    "Vietnam",
];

/// Picker entry that clears the display instead of looking anything up.
pub const CLEAR_CHOICE: &str = "(clear)";

pub fn choices() -> Vec<&'static str> {
    std::iter::once(CLEAR_CHOICE).chain(COUNTRIES.iter().copied()).collect()
}

/// Map a picker entry to the selection value handed to the core.
pub fn selection_value(choice: &str) -> &str {
    if choice == CLEAR_CHOICE { "" } else { choice }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_choice_comes_first_and_maps_to_empty() {
        let choices = choices();

        assert_eq!(choices[0], CLEAR_CHOICE);
        assert_eq!(choices.len(), COUNTRIES.len() + 1);
        assert_eq!(selection_value(CLEAR_CHOICE), "");
        assert_eq!(selection_value("Japan"), "Japan");
    }

    #[test]
    fn country_list_is_sorted_and_unique() {
        let mut sorted = COUNTRIES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        assert_eq!(sorted, COUNTRIES);
    }
}
