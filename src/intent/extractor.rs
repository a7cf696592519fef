//! Field extraction from a single free-text utterance.
//!
//! Steps run in a fixed order and each one removes the text it matched, so
//! later steps only see the residual string: quantity, cost, status, date,
//! unit, material name, intent, confidence.

use chrono::{Datelike, Duration, Local, NaiveDate};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;
use tracing::debug;

use super::types::{DeliveryDate, MaterialStatus, ParsedMaterialRequest, RequestIntent};
use super::vocab;

/// `1.500,00` (grouped) first, then plain `12`, `2,5`, `2.5`.
const NUMBER: &str = r"\d{1,3}(?:\.\d{3})+(?:,\d+)?\b|\d+(?:[.,]\d+)?";

const BASE_CONFIDENCE: f32 = 0.5;
const INFO_PAIR_CONFIDENCE: f32 = 0.9;
const INFO_PREFIX_CONFIDENCE: f32 = 0.8;

/// Compiled patterns for the extractor. Build once and reuse.
pub struct FieldExtractor {
    number: Regex,
    cost: Regex,
    date: Regex,
    unit: Regex,
}

impl FieldExtractor {
    pub fn new() -> Self {
        // Static patterns; covered by the tests below.
        let units = vocab::UNIT_WORDS
            .iter()
            .map(|u| regex::escape(u))
            .collect::<Vec<_>>()
            .join("|");

        Self {
            number: Regex::new(NUMBER).expect("Invalid regex pattern"),
            cost: Regex::new(&format!(
                r"(?i)(?:r\$|\bcusto\b|\bvalor\b)\s*(?:de\s+)?:?\s*({NUMBER})|({NUMBER})\s*reais\b"
            ))
            .expect("Invalid regex pattern"),
            date: Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b")
                .expect("Invalid regex pattern"),
            unit: Regex::new(&format!(r"(?i)\b({units})\b")).expect("Invalid regex pattern"),
        }
    }

    /// Extract a request from `text`, resolving relative dates against `today`.
    pub fn extract(&self, text: &str, today: NaiveDate) -> ParsedMaterialRequest {
        let mut residual = text.to_string();
        let mut request = ParsedMaterialRequest::default();

        request.quantity = self.take_quantity(&mut residual);
        request.estimated_total_cost = self.take_cost(&mut residual);
        request.status = detect_status(&residual);
        request.delivery_date = self.take_date(&mut residual, today);
        request.unit = self.take_unit(&mut residual);
        request.material_name = material_name(&residual);

        let mut confidence = BASE_CONFIDENCE;
        if request.quantity.is_some() {
            confidence += 0.2;
        }
        if request.estimated_total_cost.is_some() {
            confidence += 0.1;
        }
        if request.unit.is_some() {
            confidence += 0.2;
        }
        match &request.material_name {
            Some(name) if name.chars().count() > 2 => confidence += 0.1,
            _ => confidence -= 0.2,
        }
        request.confidence = ((confidence * 100.0).round() / 100.0).clamp(0.0, 1.0);

        let lower = text.to_lowercase();
        if vocab::mentions(&lower, vocab::INFO_WORDS) && vocab::mentions(&lower, vocab::PROJECT_WORDS) {
            request.intent = RequestIntent::ProjectInfo;
            request.confidence = INFO_PAIR_CONFIDENCE;
        } else if vocab::INFO_PREFIXES.iter().any(|p| lower.trim_start().starts_with(p)) {
            request.intent = RequestIntent::ProjectInfo;
            request.confidence = INFO_PREFIX_CONFIDENCE;
        }

        debug!(
            intent = ?request.intent,
            confidence = request.confidence,
            quantity = ?request.quantity,
            unit = ?request.unit,
            "Extracted material request"
        );
        request
    }

    /// First number that is not part of a date or a word. Numbers sitting
    /// next to a currency marker are left for the cost step.
    fn take_quantity(&self, residual: &mut String) -> Option<f64> {
        let (range, value) = {
            let text = residual.as_str();
            let found = self
                .number
                .find_iter(text)
                .find(|m| !glued_to_word_or_date(text, m.range()) && !next_to_currency(text, m.range()))?;
            (found.range(), parse_decimal(found.as_str())?)
        };

        blank(residual, range);
        Some(value)
    }

    fn take_cost(&self, residual: &mut String) -> Option<f64> {
        let (range, value) = {
            let caps = self.cost.captures(residual.as_str())?;
            let amount = caps.get(1).or_else(|| caps.get(2))?;
            (caps.get(0)?.range(), parse_decimal(amount.as_str())?)
        };
        blank(residual, range);
        Some(value)
    }

    fn take_date(&self, residual: &mut String, today: NaiveDate) -> Option<DeliveryDate> {
        if let Some(date) = self.parse_day_month(residual.as_str(), today) {
            if let Some(m) = self.date.find(residual.as_str()) {
                let range = m.range();
                blank(residual, range);
            }
            return date.map(DeliveryDate::On);
        }

        let lower = residual.to_lowercase();
        if lower.contains(vocab::TODAY_WORD) {
            Some(DeliveryDate::On(today))
        } else if vocab::mentions(&lower, vocab::TOMORROW_WORDS) {
            Some(DeliveryDate::On(today + Duration::days(1)))
        } else {
            None
        }
    }

    /// `DD/MM[/YY[YY]]`. The outer option reports whether the pattern was
    /// present at all; the inner one whether it named a real calendar day.
    pub fn parse_day_month(&self, text: &str, today: NaiveDate) -> Option<Option<NaiveDate>> {
        let caps = self.date.captures(text)?;
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year = match caps.get(3) {
            Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
            Some(y) => y.as_str().parse::<i32>().ok()?,
            None => today.year(),
        };
        Some(NaiveDate::from_ymd_opt(year, month, day))
    }

    fn take_unit(&self, residual: &mut String) -> Option<String> {
        let m = self.unit.find(residual.as_str())?;
        let unit = vocab::canonical_unit(m.as_str());
        let range = m.range();
        blank(residual, range);
        Some(unit)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn shared() -> &'static FieldExtractor {
    static EXTRACTOR: OnceLock<FieldExtractor> = OnceLock::new();
    EXTRACTOR.get_or_init(FieldExtractor::new)
}

/// Parse against the local wall-clock date.
pub fn parse(utterance: &str) -> ParsedMaterialRequest {
    parse_at(utterance, Local::now().date_naive())
}

pub fn parse_at(utterance: &str, today: NaiveDate) -> ParsedMaterialRequest {
    shared().extract(utterance, today)
}

/// First decimal number in `text`, accepting `,` as separator.
pub fn first_number(text: &str) -> Option<f64> {
    shared().number.find(text).and_then(|m| parse_decimal(m.as_str()))
}

/// `DD/MM[/YY[YY]]` lookup for free-text date answers.
pub fn day_month(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    shared().parse_day_month(text, today).flatten()
}

/// `1.500,00` and `1.500` are grouped thousands; `2,5` and `2.5` are decimals.
fn parse_decimal(raw: &str) -> Option<f64> {
    let grouped = raw.contains('.')
        && raw
            .split(',')
            .next()
            .is_some_and(|int| int.split('.').skip(1).all(|group| group.len() == 3));
    let normalized = if grouped {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.replace(',', ".")
    };
    normalized.parse().ok()
}

/// Glued to a letter, digit or `/`, or continuing another number after a
/// `.` or `,` separator.
fn glued_to_word_or_date(text: &str, range: Range<usize>) -> bool {
    let mut before_chars = text[..range.start].chars().rev();
    let before = before_chars.next();
    let after = text[range.end..].chars().next();
    let continues_number =
        matches!(before, Some('.' | ',')) && before_chars.next().is_some_and(|c| c.is_ascii_digit());
    matches!(before, Some(c) if c.is_alphanumeric() || c == '/') || after == Some('/') || continues_number
}

fn next_to_currency(text: &str, range: Range<usize>) -> bool {
    let prefix = text[..range.start].to_lowercase();
    let prefix = prefix.trim_end_matches(|c: char| c.is_whitespace() || c == ':');
    let prefix = prefix.strip_suffix(" de").unwrap_or(prefix).trim_end();
    let suffix = text[range.end..].to_lowercase();
    ["r$", "custo", "valor"].iter().any(|m| prefix.ends_with(m)) || suffix.trim_start().starts_with("reais")
}

fn blank(text: &mut String, range: Range<usize>) {
    text.replace_range(range, " ");
}

fn detect_status(residual: &str) -> Option<MaterialStatus> {
    let lower = residual.to_lowercase();
    if vocab::mentions(&lower, vocab::DELIVERED_WORDS) {
        Some(MaterialStatus::Delivered)
    } else if vocab::mentions(&lower, vocab::USED_WORDS) {
        Some(MaterialStatus::Used)
    } else {
        None
    }
}

fn material_name(residual: &str) -> Option<String> {
    let words: Vec<String> = residual
        .split_whitespace()
        .filter_map(|raw| {
            let lower = raw.to_lowercase();
            let word = lower.trim_matches(|c: char| !c.is_alphanumeric());
            if word.is_empty() || vocab::is_stop_word(&lower) || vocab::is_stop_word(word) {
                None
            } else {
                Some(title_case(word))
            }
        })
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_patterns_compile() {
        let extractor = FieldExtractor::new();
        assert!(extractor.unit.is_match("10 SACOS"));
        assert!(extractor.unit.is_match("2 pç"));
    }

    #[test]
    fn test_number_inside_unit_is_not_quantity() {
        let req = parse_at("piso m2", today());
        assert_eq!(req.quantity, None);
        assert_eq!(req.unit.as_deref(), Some("m2"));
    }

    #[test]
    fn test_date_digits_are_not_quantity() {
        let req = parse_at("cimento 05/11", today());
        assert_eq!(req.quantity, None);
        assert_eq!(
            req.delivery_date,
            Some(DeliveryDate::On(NaiveDate::from_ymd_opt(2026, 11, 5).unwrap()))
        );
    }

    #[test]
    fn test_quantity_skips_currency_amount() {
        let req = parse_at("R$ 300 por 12 caixas de piso", today());
        assert_eq!(req.quantity, Some(12.0));
        assert_eq!(req.estimated_total_cost, Some(300.0));
        assert_eq!(req.unit.as_deref(), Some("caixa"));
    }

    #[test]
    fn test_grouped_thousands() {
        assert_eq!(parse_decimal("1.500,00"), Some(1500.0));
        assert_eq!(parse_decimal("12.000"), Some(12000.0));
        assert_eq!(parse_decimal("2.5"), Some(2.5));
        assert_eq!(parse_decimal("89,90"), Some(89.9));
        assert_eq!(first_number("uns 2.300,50 reais"), Some(2300.5));
    }

    #[test]
    fn test_fragment_after_separator_is_not_a_number_of_its_own() {
        assert!(glued_to_word_or_date("1.5x0", 2..3));
        assert!(glued_to_word_or_date("R$ 9,99", 5..7));
        assert!(!glued_to_word_or_date("itens, 3 caixas", 7..8));
    }

    #[test]
    fn test_title_case_keeps_accents() {
        assert_eq!(title_case("água"), "Água");
    }

    #[test]
    fn test_first_number_accepts_comma() {
        assert_eq!(first_number("uns 12,5 talvez"), Some(12.5));
        assert_eq!(first_number("não sei"), None);
    }
}
