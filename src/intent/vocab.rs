//! Fixed Portuguese vocabularies used by the extractor.

/// Units accepted by the extractor, longest spellings first so the
/// alternation prefers `m2` over `m` and `sacos` over `saco`.
pub const UNIT_WORDS: &[&str] = &[
    "toneladas", "tonelada", "metros", "metro", "litros", "litro", "caixas", "caixa",
    "fardos", "fardo", "sacos", "saco", "ton", "m2", "m3", "kg", "ml", "cm", "mm", "un",
    "pc", "pç", "g", "l", "m",
];

/// Chip values offered when asking for the unit.
pub const UNIT_CHOICES: &[&str] = &["un", "kg", "m", "saco", "caixa"];

/// Maps a matched unit spelling to its canonical form.
pub fn canonical_unit(word: &str) -> String {
    let word = word.to_lowercase();
    let canonical = match word.as_str() {
        "pç" => "pc",
        "metro" | "metros" => "m",
        "litro" | "litros" => "l",
        "sacos" => "saco",
        "caixas" => "caixa",
        "fardos" => "fardo",
        "toneladas" => "tonelada",
        other => other,
    };
    canonical.to_string()
}

pub const DELIVERED_WORDS: &[&str] = &["entregue", "recebido"];
pub const USED_WORDS: &[&str] = &["usado", "utilizado"];

pub const TODAY_WORD: &str = "hoje";
pub const TOMORROW_WORDS: &[&str] = &["amanhã", "amanha"];

/// Date answers also accept the English spellings offered by the chips.
pub const TODAY_ANSWERS: &[&str] = &["hoje", "today"];
pub const TOMORROW_ANSWERS: &[&str] = &["amanhã", "amanha", "tomorrow"];
pub const SKIP_WORDS: &[&str] = &["pular", "skip"];
pub const NO_COST_WORDS: &[&str] = &["não", "nao", "skip"];

/// Words that mark a question about a project rather than a new material.
pub const INFO_WORDS: &[&str] = &[
    "quanto", "quanta", "custo", "gastei", "gasto", "gastos", "resumo", "info",
    "informação", "informações", "total", "status", "situação",
];
pub const PROJECT_WORDS: &[&str] = &["projeto", "obra", "project"];
pub const INFO_PREFIXES: &[&str] = &["resumo", "info", "give project"];
pub const ALL_PROJECTS_WORDS: &[&str] = &["todos", "geral"];
pub const ABANDON_WORDS: &[&str] = &["cancelar", "sair"];

/// Residual words dropped before the material name is formed.
pub const STOP_WORDS: &[&str] = &[
    // prepositions and articles
    "de", "do", "da", "dos", "das", "para", "pra", "com", "em", "no", "na", "nos", "nas",
    "o", "a", "os", "as", "um", "uma", "e", "por", "ao",
    // command verbs
    "adicionar", "adiciona", "adicione", "add", "comprar", "compra", "compre", "pedir",
    "pedido", "preciso", "quero", "registrar", "registre", "cadastrar", "criar",
    "solicitar", "solicito", "entregar", "lançar",
    // status and date keywords
    "entregue", "recebido", "usado", "utilizado", "hoje", "amanhã", "amanha",
    // domain filler
    "material", "materiais", "obra", "projeto", "custo", "valor", "reais", "r$",
    "unidade", "unidades", "quantidade", "total",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Whether `text` (already lower-cased) contains any of `words`.
pub fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}
