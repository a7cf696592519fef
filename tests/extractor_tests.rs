use chrono::NaiveDate;
use planitec::intent::{parse_at, DeliveryDate, MaterialStatus, RequestIntent};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn test_sacks_of_cement() {
    let req = parse_at("10 sacos de cimento", today());

    assert_eq!(req.quantity, Some(10.0));
    assert_eq!(req.unit.as_deref(), Some("saco"));
    assert_eq!(req.material_name.as_deref(), Some("Cimento"));
    assert_eq!(req.status(), MaterialStatus::Requested);
    assert_eq!(req.intent, RequestIntent::AddMaterial);
    assert!(req.confidence >= 0.9, "confidence was {}", req.confidence);
}

#[test]
fn test_currency_amount_is_cost_not_quantity() {
    let req = parse_at("R$ 500 amanhã", today());

    assert_eq!(req.quantity, None);
    assert_eq!(req.quantity(), 1.0);
    assert_eq!(req.estimated_total_cost, Some(500.0));
    assert_eq!(
        req.delivery_date,
        Some(DeliveryDate::On(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()))
    );
}

#[test]
fn test_reais_suffix_is_cost() {
    let req = parse_at("5 caixas de piso 300 reais", today());

    assert_eq!(req.quantity, Some(5.0));
    assert_eq!(req.estimated_total_cost, Some(300.0));
    assert_eq!(req.unit.as_deref(), Some("caixa"));
    assert_eq!(req.material_name.as_deref(), Some("Piso"));
}

#[test]
fn test_decimal_comma() {
    let req = parse_at("2,5 metros de cabo custo 89,90", today());

    assert_eq!(req.quantity, Some(2.5));
    assert_eq!(req.unit.as_deref(), Some("m"));
    assert_eq!(req.estimated_total_cost, Some(89.9));
    assert_eq!(req.material_name.as_deref(), Some("Cabo"));
}

#[test]
fn test_relative_dates() {
    let req = parse_at("3 kg de prego para hoje", today());
    assert_eq!(req.delivery_date, Some(DeliveryDate::On(today())));

    let req = parse_at("3 kg de prego amanha", today());
    assert_eq!(
        req.delivery_date,
        Some(DeliveryDate::On(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()))
    );
}

#[test]
fn test_explicit_date_with_short_year() {
    let req = parse_at("20 tijolos 15/01/27", today());

    assert_eq!(req.quantity, Some(20.0));
    assert_eq!(
        req.delivery_date,
        Some(DeliveryDate::On(NaiveDate::from_ymd_opt(2027, 1, 15).unwrap()))
    );
    assert_eq!(req.material_name.as_deref(), Some("Tijolos"));
}

#[test]
fn test_status_keywords() {
    assert_eq!(parse_at("areia entregue", today()).status(), MaterialStatus::Delivered);
    assert_eq!(parse_at("areia recebido", today()).status(), MaterialStatus::Delivered);
    assert_eq!(parse_at("brita usado", today()).status(), MaterialStatus::Used);
    assert_eq!(parse_at("brita utilizado", today()).status(), MaterialStatus::Used);
    assert_eq!(parse_at("brita", today()).status(), MaterialStatus::Requested);
}

#[test]
fn test_status_words_do_not_leak_into_name() {
    let req = parse_at("adicionar 4 sacos de cal entregue", today());
    assert_eq!(req.material_name.as_deref(), Some("Cal"));
    assert_eq!(req.status, Some(MaterialStatus::Delivered));
}

#[test]
fn test_project_summary_request() {
    let req = parse_at("resumo do projeto Casa Silva", today());
    assert_eq!(req.intent, RequestIntent::ProjectInfo);
    assert!(req.confidence >= 0.8);

    let req = parse_at("quanto gastei na obra Galpão Norte?", today());
    assert_eq!(req.intent, RequestIntent::ProjectInfo);
    assert_eq!(req.confidence, 0.9);
}

#[test]
fn test_gibberish_is_low_confidence() {
    let req = parse_at("oi", today());
    assert!(req.confidence < 0.4, "confidence was {}", req.confidence);
    assert_eq!(req.quantity, None);
}

#[test]
fn test_grouped_currency_amount_leaves_quantity_unset() {
    let req = parse_at("R$ 1.500,00 de cimento", today());

    assert_eq!(req.quantity, None);
    assert_eq!(req.quantity(), 1.0);
    assert_eq!(req.estimated_total_cost, Some(1500.0));
    assert_eq!(req.material_name.as_deref(), Some("Cimento"));
    assert_eq!(req.confidence, 0.7);
}

#[test]
fn test_grouped_quantity_next_to_cost() {
    let req = parse_at("2.000 tijolos por 1.250,50 reais", today());

    assert_eq!(req.quantity, Some(2000.0));
    assert_eq!(req.estimated_total_cost, Some(1250.5));
    assert_eq!(req.material_name.as_deref(), Some("Tijolos"));
}
