//! Call-to-action detection: should the UI show the WhatsApp button?
//!
//! Matching is on whole words of the case- and accent-folded text, so
//! "se apagó" does not count as "pago".

/// Buying-intent vocabulary in the customer's message, folded.
const CUSTOMER_KEYWORDS: &[&str] = &[
    "whatsapp",
    "comprar",
    "comprarlo",
    "comprarla",
    "compro",
    "lo quiero",
    "la quiero",
    "me interesa",
    "pagar",
    "pago",
    "pagos",
    "presupuesto",
    "cotizacion",
    "apartar",
    "reservar",
    "zelle",
    "binance",
    "efectivo",
    "precio exacto",
];

/// What the reply says when the model follows the closing instruction.
/// Price disclaimers ("presupuesto formal", "finalizar la compra") are
/// mandatory in every price answer and do not count.
const REPLY_KEYWORDS: &[&str] = &["whatsapp"];

/// True when the customer's message shows buying intent or the generated
/// reply points the customer to the contact button.
pub fn wants_contact(user_message: &str, reply: &str) -> bool {
    mentions_any(user_message, CUSTOMER_KEYWORDS) || mentions_any(reply, REPLY_KEYWORDS)
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let haystack = format!(" {} ", words(text).join(" "));
    keywords.iter().any(|k| haystack.contains(&format!(" {k} ")))
}

/// Folded words: lowercase, no Spanish diacritics, split on anything that
/// is not a letter or digit.
fn words(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}
