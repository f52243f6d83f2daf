//! Rule tables.
//!
//! Every pattern targets Portuguese prose. Character classes use Unicode
//! properties (`\p{Lu}`, `\p{Ll}`) so accented letters behave like their
//! ASCII counterparts.

use super::{Catalog, Normalization, RuleSpec};

/// AI catalog used in content-type mode.
pub const GENERAL_AI_NORMALIZATION: Normalization = Normalization {
    divisor: 3.0,
    floor: 0.0,
    cap: 100.0,
};

/// Human catalog used in both modes.
pub const HUMAN_NORMALIZATION: Normalization = Normalization {
    divisor: 6.0,
    floor: 0.0,
    cap: 100.0,
};

/// Mixed-sign AI catalog used in academic-level mode.
pub const ACADEMIC_NORMALIZATION: Normalization = Normalization {
    divisor: 3.0,
    floor: -100.0,
    cap: 100.0,
};

/// Marker catalogs only need match positions; their sums are never used.
const MARKER_NORMALIZATION: Normalization = Normalization {
    divisor: 1.0,
    floor: 0.0,
    cap: 100.0,
};

/// Phrasing typical of assistant-generated text.
pub const GENERAL_AI_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"(?i)\b(?:é importante (?:ressaltar|destacar|notar|mencionar|lembrar)|vale (?:a pena )?(?:ressaltar|destacar|mencionar|lembrar)|cabe (?:ressaltar|destacar|mencionar))\b",
        weight: 20,
        description: "Fórmulas de ênfase genéricas",
    },
    RuleSpec {
        pattern: r"(?m)(?:^|[.!?]\s+)(?:Além disso|Ademais|Outrossim|Adicionalmente),",
        weight: 12,
        description: "Conectivos aditivos abrindo frases",
    },
    RuleSpec {
        pattern: r"(?i)\bdesempenh(?:a|am|ando) um papel (?:fundamental|crucial|essencial|importante|central)\b",
        weight: 18,
        description: "Clichê do papel fundamental",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:no cenário atual|no mundo (?:atual|contemporâneo|moderno)|nos dias de hoje|na era (?:digital|moderna|atual))\b",
        weight: 15,
        description: "Contextualização temporal genérica",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:uma (?:ampla|vasta) gama|uma grande variedade|um amplo leque)\b",
        weight: 12,
        description: "Enumeração vaga de possibilidades",
    },
    RuleSpec {
        pattern: r"(?m)(?:^|[.!?]\s+)(?:Em suma|Em resumo|Em conclusão|Em síntese|Concluindo),",
        weight: 15,
        description: "Fechamento formulaico",
    },
    RuleSpec {
        pattern: r"(?i)\bnão (?:apenas|só|somente)\b[^.!?]{1,120}\bmas também\b",
        weight: 14,
        description: "Paralelismo não apenas / mas também",
    },
    RuleSpec {
        pattern: r"(?i)(?:espero que (?:isso|isto|essas informações|estas informações) (?:ajude|ajudem|seja útil|sejam úteis)|fico à disposição|se (?:precisar|tiver) (?:de )?mais (?:alguma )?(?:ajuda|dúvida|informação))",
        weight: 30,
        description: "Encerramento de assistente",
    },
    RuleSpec {
        pattern: r"(?im)^\s*(?:Claro|Certamente|Com certeza|Ótima pergunta|Excelente pergunta)[!,.:]",
        weight: 25,
        description: "Abertura de assistente",
    },
    RuleSpec {
        pattern: r"(?is)\bpor um lado\b.{10,300}?\bpor outro lado\b",
        weight: 16,
        description: "Estrutura dialética balanceada",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:crucial|primordial|imprescindível|indispensável)\b",
        weight: 4,
        description: "Adjetivos de intensidade",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:robust[oa]s?|abrangentes?|holístic[oa]s?|sinergias?|alavancar|potencializar)\b",
        weight: 6,
        description: "Vocabulário inflado",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:desse modo|sendo assim|nesse sentido|nesse contexto|diante disso)\b",
        weight: 6,
        description: "Transições encadeadas",
    },
];

/// Signals of personal, unpolished authorship.
pub const HUMAN_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"(?i)\b(?:na minha experiência|em minha experiência|pela minha experiência|eu mesm[oa]|lembro (?:que|de|quando)|quando eu era)\b",
        weight: 25,
        description: "Relato de experiência pessoal",
    },
    RuleSpec {
        pattern: r"(?i)\beu\b",
        weight: 3,
        description: "Primeira pessoa do singular",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:acho que|acredito que|não sei se|não tenho certeza|sei lá)\b",
        weight: 8,
        description: "Opinião e incerteza",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:tipo assim|né|pra|tá|cara|beleza|putz)\b",
        weight: 6,
        description: "Coloquialismos",
    },
    RuleSpec {
        pattern: r"(?i)(?:\(sic\)|\[grifo nosso\]|\[itálico do autor\]|nota do autor:)",
        weight: 20,
        description: "Marcas editoriais",
    },
    RuleSpec {
        pattern: r"(?:[!?]{2,}|\.{3}|…)",
        weight: 5,
        description: "Pontuação expressiva",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:k{3,}|rs(?:rs)*|ha(?:ha)+|vc|pq|tb|msm|blz)\b",
        weight: 10,
        description: "Abreviações de internet",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:ontem|semana passada|no ano passado|naquela época|quando criança)\b",
        weight: 8,
        description: "Marcos temporais pessoais",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:em suma|em conclusão|em síntese)\b",
        weight: -10,
        description: "Fechamento formulaico (reduz indício humano)",
    },
];

/// Mixed-sign catalog tuned for academic writing.
///
/// Positive weights lean AI, negative weights lean human.
pub const ACADEMIC_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"(?:\p{Lu}\p{Ll}+(?: et al\.|, \p{Lu}\.){1,3}(?:\s*\(\d{4}\)[^;]{0,50}){3,})",
        weight: 30,
        description: "Acúmulo excessivo de citações em sequência",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:importante ressaltar|cabe destacar|vale mencionar|convém observar)\b[^.!?]{0,100}\b(?:que|o fato de|a importância)\b",
        weight: 25,
        description: "Fórmulas retóricas vazias",
    },
    RuleSpec {
        pattern: r"(?i)\.\s*(?:Ademais|Além disso|Por outro lado|Contudo|Todavia)\b[^.!?]{20,80}\.\s*(?:No entanto|Entretanto|Assim sendo)\b",
        weight: 28,
        description: "Encadeamento excessivamente lógico",
    },
    RuleSpec {
        pattern: r"(?i)Por um lado[^.!?]{50,150}Por outro lado[^.!?]{50,150}Dessa forma",
        weight: 32,
        description: "Estrutura dialética artificialmente balanceada",
    },
    RuleSpec {
        pattern: r#""[^"]{20,100}"\s*(?:\([^)]{10,50}\)\.)(?:\s*\p{Lu}){1,3}[^.!?]{50,150}\."[^"]{20,100}""#,
        weight: 35,
        description: "Citações encadeadas sem análise pessoal",
    },
    RuleSpec {
        pattern: r"(?i)\b(\w{8,})\b[^.!?]{100,300}\b\1\b[^.!?]{100,300}\b\1\b",
        weight: -40,
        description: "Repetição vocabular (indica humano)",
    },
    RuleSpec {
        pattern: r"(?i)(?:\(sic\)|\[grifo nosso\]|\[itálico do autor\]|nota do autor:|como veremos mais adiante)",
        weight: -50,
        description: "Marcas editoriais humanas",
    },
    RuleSpec {
        pattern: r"(?:\(\w+,\s*\d{4}[a-z]?\)|\(\w+\s+\d{4}\))",
        weight: -25,
        description: "Variações na formatação de citações",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:em minha experiência|na minha experiência|na prática docente|observamos em sala|durante a pesquisa)",
        weight: -60,
        description: "Experiências pessoais",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:talvez|provavelmente|possivelmente|parece que|aparentemente|não está claro)",
        weight: -30,
        description: "Expressões de incerteza",
    },
];

/// Explicit self-identification as an AI system.
pub const SELF_IDENTIFICATION_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"(?i)\bcomo (?:um|uma) (?:modelo de (?:ia|linguagem)|inteligência artificial|assistente (?:virtual|de ia))\b",
        weight: 100,
        description: "Autoidentificação como IA",
    },
    RuleSpec {
        pattern: r"(?i)\bsou (?:um|uma) (?:modelo de (?:ia|linguagem)|inteligência artificial|assistente de ia)\b",
        weight: 100,
        description: "Declaração de ser uma IA",
    },
    RuleSpec {
        pattern: r"(?i)\bas an ai(?: language model| assistant)?\b",
        weight: 100,
        description: "Autoidentificação como IA (inglês)",
    },
];

/// Explicit notes declaring the text as AI-generated.
///
/// Any single marker is enough.
pub const AI_NOTE_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"(?i)\*\*\s*nota de ia\s*:?\s*\*\*",
        weight: 100,
        description: "Bloco \"Nota de IA\" em negrito",
    },
    RuleSpec {
        pattern: r"(?im)^\s*nota de ia\s*:",
        weight: 100,
        description: "Cabeçalho \"Nota de IA\"",
    },
    RuleSpec {
        pattern: r"(?i)\bgerad[oa]s? (?:por|pelo|pela|com)(?: o| a)? (?:chatgpt|gpt(?:-\d+)?|claude|gemini|copilot|bard|llama|ia|inteligência artificial)\b",
        weight: 100,
        description: "Atribuição de geração por modelo",
    },
];

/// Canned conclusion phrase pairs, examined in the closing paragraph only.
pub const CONCLUSION_RULES: &[RuleSpec] = &[
    RuleSpec {
        pattern: r"(?is)\b(?:em suma|em resumo|em síntese|em conclusão|concluindo)\b.{0,200}?\b(?:fica evidente|é possível concluir|pode-se concluir|conclui-se|fica claro)\b",
        weight: 25,
        description: "Resumo seguido de conclusão explícita",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:portanto|dessa forma|assim sendo)\b[^.!?]{0,150}\b(?:é fundamental|é essencial|é crucial|torna-se imprescindível)\b",
        weight: 20,
        description: "Consequência seguida de imperativo genérico",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:espera-se que|é de suma importância que)\b[^.!?]{0,150}\b(?:futur[oa]s?|próximos anos|sociedade como um todo)\b",
        weight: 15,
        description: "Projeção genérica de futuro",
    },
    RuleSpec {
        pattern: r"(?i)\b(?:em última análise|no fim das contas)\b[^.!?]{0,150}\b(?:papel|importância|impacto)\b",
        weight: 15,
        description: "Avaliação final genérica",
    },
];

/// Every catalog the engine uses, compiled once.
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// AI-leaning phrasing (content-type mode).
    pub general_ai: Catalog,
    /// Human-leaning signals (both modes).
    pub human: Catalog,
    /// Mixed-sign academic catalog (academic-level mode).
    pub academic: Catalog,
    /// Self-identification phrases.
    pub self_identification: Catalog,
    /// Explicit AI-note markers.
    pub ai_note: Catalog,
    /// Canned conclusion phrase pairs.
    pub conclusion: Catalog,
}

impl Catalogs {
    /// Compile every catalog with the given backtrack limit.
    #[tracing::instrument(level = "debug")]
    pub fn compile(backtrack_limit: usize) -> Self {
        Self {
            general_ai: Catalog::compile(
                "ia-geral",
                GENERAL_AI_RULES,
                GENERAL_AI_NORMALIZATION,
                backtrack_limit,
            ),
            human: Catalog::compile("humano", HUMAN_RULES, HUMAN_NORMALIZATION, backtrack_limit),
            academic: Catalog::compile(
                "ia-academico",
                ACADEMIC_RULES,
                ACADEMIC_NORMALIZATION,
                backtrack_limit,
            ),
            self_identification: Catalog::compile(
                "autoidentificacao",
                SELF_IDENTIFICATION_RULES,
                MARKER_NORMALIZATION,
                backtrack_limit,
            ),
            ai_note: Catalog::compile(
                "nota-ia",
                AI_NOTE_RULES,
                MARKER_NORMALIZATION,
                backtrack_limit,
            ),
            conclusion: Catalog::compile(
                "conclusao",
                CONCLUSION_RULES,
                MARKER_NORMALIZATION,
                backtrack_limit,
            ),
        }
    }

    /// Catalogs in listing order, for display.
    pub fn all(&self) -> [&Catalog; 6] {
        [
            &self.general_ai,
            &self.human,
            &self.academic,
            &self.self_identification,
            &self.ai_note,
            &self.conclusion,
        ]
    }
}
