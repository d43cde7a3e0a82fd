//! Rendering of the per-installation check-in call message.

use chrono::DateTime;
use chrono_tz::Tz;
use regex::Captures;

/// Used when an installation has no template configured.
pub const DEFAULT_MESSAGE_TEMPLATE: &str =
    "Hola, central de monitoreo: confirme estado de {installation} a las {time}.";

lazy_static::lazy_static! {
    static ref PLACEHOLDER_REGEX: regex::Regex = regex::Regex::new(r"\{(\w+)\}").unwrap();
}

/// Values available to a message template.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub installation: &'a str,
    pub client: Option<&'a str>,
    pub slot_at: DateTime<Tz>,
}

/// Substitutes `{installation}`, `{client}`, `{date}` and `{time}`.
///
/// Unknown placeholders are left untouched.
pub fn render_message(template: Option<&str>, ctx: &MessageContext<'_>) -> String {
    let template = template
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_MESSAGE_TEMPLATE);

    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "installation" => ctx.installation.to_string(),
            "client" => ctx.client.unwrap_or_default().to_string(),
            "date" => ctx.slot_at.format("%d-%m-%Y").to_string(),
            "time" => ctx.slot_at.format("%H:%M").to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Santiago;

    fn ctx() -> MessageContext<'static> {
        MessageContext {
            installation: "Condominio Los Robles",
            client: Some("Inmobiliaria Sur"),
            slot_at: Santiago.with_ymd_and_hms(2025, 9, 1, 21, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_default_template() {
        assert_eq!(
            render_message(None, &ctx()),
            "Hola, central de monitoreo: confirme estado de Condominio Los Robles a las 21:00."
        );
    }

    #[test]
    fn test_render_blank_template_uses_default() {
        assert_eq!(
            render_message(Some("  "), &ctx()),
            render_message(None, &ctx())
        );
    }

    #[test]
    fn test_render_all_placeholders() {
        let message = render_message(
            Some("{client} / {installation}: llamada {date} {time}"),
            &ctx(),
        );
        assert_eq!(
            message,
            "Inmobiliaria Sur / Condominio Los Robles: llamada 01-09-2025 21:00"
        );
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        assert_eq!(
            render_message(Some("Guardia {guard} en {installation}"), &ctx()),
            "Guardia {guard} en Condominio Los Robles"
        );
    }

    #[test]
    fn test_render_missing_client() {
        let mut c = ctx();
        c.client = None;
        assert_eq!(render_message(Some("[{client}]"), &c), "[]");
    }
}
