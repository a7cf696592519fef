use crate::catalog::format_brl;
use crate::intent::ParsedMaterialRequest;
use crate::kernel::event::{ChatMessage, Role};

/// PURE FUNCTION: pending record -> confirmation card text.
pub fn confirmation_card(record: &ParsedMaterialRequest) -> String {
    let unset = "-";
    let quantity = format!(
        "{} {}",
        format_quantity(record.quantity()),
        record.unit.as_deref().unwrap_or("un")
    );

    let lines = [
        ("Material", record.material_name.clone().unwrap_or_else(|| unset.to_string())),
        ("Quantidade", quantity),
        (
            "Custo total",
            record
                .estimated_total_cost
                .map(format_brl)
                .unwrap_or_else(|| unset.to_string()),
        ),
        ("Status", record.status().label().to_string()),
        (
            "Entrega",
            record
                .delivery_date
                .as_ref()
                .map(|d| d.to_string())
                .unwrap_or_else(|| unset.to_string()),
        ),
        ("Projeto", record.project_name.clone().unwrap_or_else(|| unset.to_string())),
        ("Etapa", record.stage_name.clone().unwrap_or_else(|| unset.to_string())),
        ("Fornecedor", record.supplier_name.clone().unwrap_or_else(|| unset.to_string())),
    ];

    let mut card = String::from("Confira os dados do material:\n");
    for (label, value) in lines {
        card.push_str(&format!("• {}: {}\n", label, value));
    }
    card.push_str("Confirma o cadastro?");
    card
}

/// `10.0` -> `10`, `2.5` -> `2,5`
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string().replace('.', ",")
    }
}

/// Plain-text rendering of a transcript entry, options numbered from 1.
pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "Você",
        Role::Assistant => "Assistente",
    };

    let mut out = format!("{}: {}", speaker, message.content);
    for (i, option) in message.options.iter().enumerate() {
        out.push_str(&format!("\n  #{} {}", i + 1, option.label));
    }
    if message.pending.is_some() {
        out.push_str("\n  /confirmar  /cancelar");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{ChatOption, OptionKind};

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(10.0), "10");
        assert_eq!(format_quantity(2.5), "2,5");
    }

    #[test]
    fn test_card_lists_defaults() {
        let record = ParsedMaterialRequest {
            material_name: Some("Cimento".to_string()),
            quantity: Some(10.0),
            unit: Some("saco".to_string()),
            estimated_total_cost: Some(350.0),
            ..Default::default()
        };
        let card = confirmation_card(&record);
        assert!(card.contains("• Quantidade: 10 saco"));
        assert!(card.contains("• Custo total: R$ 350,00"));
        assert!(card.contains("• Status: Solicitado"));
        assert!(card.contains("• Fornecedor: -"));
    }

    #[test]
    fn test_options_are_numbered() {
        let message = ChatMessage::assistant("Qual a unidade de medida?").with_options(vec![
            ChatOption::new("un", "un", OptionKind::Unit),
            ChatOption::new("kg", "kg", OptionKind::Unit),
        ]);
        let text = render_message(&message);
        assert!(text.contains("#1 un"));
        assert!(text.contains("#2 kg"));
    }
}
