//! System prompt rendering.
//!
//! The prompt is rebuilt for every request from the current profile and rate,
//! so catalog edits and rate refreshes show up immediately.

use std::fmt::Write;

use crate::money::{format_local, format_usd, to_local};
use crate::profile::BusinessProfile;

/// Dollar amount used in the worked conversion example.
const EXAMPLE_USD: f64 = 100.0;

/// Rendered system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    pub fn render(profile: &BusinessProfile, rate: f64) -> Self {
        let cur = &profile.local_currency;
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "Eres {}, el asesor de ventas oficial de {}.",
            profile.advisor_name, profile.store_name
        );
        let _ = writeln!(
            out,
            "Responde siempre en español, con amabilidad y de forma breve.\n"
        );

        let _ = writeln!(out, "REGLAS DE PRECIOS Y PAGOS:");
        let _ = writeln!(
            out,
            "1. La tasa oficial BCV de hoy es: {} {cur}/USD.",
            format_local(rate)
        );
        let _ = writeln!(
            out,
            "2. Formato de precio: siempre da el precio en dólares ($) primero."
        );
        let _ = writeln!(
            out,
            "3. Conversión a {cur}: di que el monto en {cur} es una REFERENCIA APROXIMADA.\n   Ejemplo: \"Son {}, que equivalen aproximadamente a {} {cur}.\"",
            format_usd(EXAMPLE_USD),
            format_local(to_local(EXAMPLE_USD, rate))
        );
        let _ = writeln!(
            out,
            "4. IVA: aclara siempre que \"Los precios publicados son base. El monto exacto con IVA y céntimos se confirma en su presupuesto formal al finalizar la compra\"."
        );
        if !profile.payment_methods.is_empty() {
            let _ = writeln!(
                out,
                "5. Métodos de pago: aceptamos {}.",
                join_spanish(&profile.payment_methods)
            );
        }
        let _ = writeln!(out, "6. No inventes productos ni precios que no estén en la lista.\n");

        let _ = writeln!(out, "PRODUCTOS DISPONIBLES:");
        if profile.products.is_empty() {
            let _ = writeln!(
                out,
                "- (Catálogo en actualización: invita al cliente a consultar por WhatsApp)"
            );
        }
        for product in &profile.products {
            let _ = writeln!(
                out,
                "- {}: {} (ref. {} {cur})",
                product.name,
                format_usd(product.price_usd),
                format_local(to_local(product.price_usd, rate))
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "DATOS DE LA TIENDA:");
        let _ = writeln!(out, "- Dirección: {}", profile.address);
        let _ = writeln!(out, "- Horario: {}\n", profile.hours);

        let _ = writeln!(out, "LÓGICA DE CIERRE (BOTÓN WHATSAPP):");
        let _ = write!(
            out,
            "- Si el cliente pregunta cómo comprar, métodos de pago o muestra interés claro, dile:\n  \"Para enviarle su presupuesto formal con IVA y concretar el pago, haga clic en el botón de WhatsApp que aparecerá abajo\"."
        );

        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// `a`, `a y b`, `a, b y c`.
fn join_spanish(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} y {}", init.join(", "), last),
    }
}
