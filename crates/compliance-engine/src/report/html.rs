//! HTML reporter
//!
//! Produces one standalone page with inline CSS. Everything derived from the
//! submitted material is escaped.

use std::fmt::Write;

use html_escape::encode_safe;
use shared_types::{AnalysisResult, Verdict};

use super::{Report, ReportSettings, ALLOWED_PHRASES, LEGAL_BASIS, MAX_LISTED_PHRASES};
use crate::error::ReportError;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; padding: 20px; max-width: 960px; margin: auto; }
.verdict { padding: 20px; border-radius: 8px; margin: 20px 0; }
.fail { background: #fee; border: 2px solid #e74c3c; }
.warn { background: #fff8e1; border: 2px solid #f39c12; }
.success { background: #efe; border: 2px solid #27ae60; }
.category { margin: 12px 0; }
.evidence { color: #555; font-size: 0.9em; }
.evidence mark { background: #fdd; }
pre { white-space: pre-wrap; background: #f6f6f6; padding: 12px; }";

/// HTML format reporter
pub struct HtmlReporter;

impl HtmlReporter {
    pub fn format(report: &Report<'_>, settings: &ReportSettings) -> Result<String, ReportError> {
        let result = report.result;
        let mut output = String::new();

        writeln!(output, "<!DOCTYPE html>")?;
        writeln!(output, "<html lang=\"ru\">")?;
        writeln!(output, "<head>")?;
        writeln!(output, "    <meta charset=\"UTF-8\">")?;
        writeln!(output, "    <title>Рекламный Инспектор | Отчет</title>")?;
        writeln!(output, "    <style>\n{}\n    </style>", STYLE)?;
        writeln!(output, "</head>")?;
        writeln!(output, "<body>")?;
        writeln!(output, "<h1>🔍 РЕКЛАМНЫЙ ИНСПЕКТОР</h1>")?;
        writeln!(
            output,
            "<p><strong>Дата:</strong> {}</p>",
            report.checked_on.format("%d.%m.%Y")
        )?;
        writeln!(
            output,
            "<p><strong>Материал:</strong> {}</p>",
            Self::escape_html(&report.material)
        )?;
        writeln!(
            output,
            "<p><strong>Тип материала:</strong> {}</p>",
            result.material_type.label()
        )?;
        writeln!(
            output,
            "<div class=\"verdict {}\">\n    <h2>Вердикт: {} {}</h2>\n    <p>Найдено запрещенных формулировок: {}</p>\n</div>",
            Self::verdict_class(result.verdict),
            result.verdict.marker(),
            result.verdict.label(),
            result.total_violations
        )?;

        Self::format_disclaimer(&mut output, result, settings)?;
        Self::format_violations(&mut output, result, settings)?;
        Self::format_recommendations(&mut output, result, settings)?;

        writeln!(output, "<h2>📚 Нормативная база</h2>")?;
        writeln!(output, "<ul>")?;
        for statute in LEGAL_BASIS {
            writeln!(output, "    <li>{}</li>", Self::escape_html(statute))?;
        }
        writeln!(output, "</ul>")?;
        writeln!(output, "</body>")?;
        writeln!(output, "</html>")?;

        Ok(output)
    }

    fn format_disclaimer(
        output: &mut String,
        result: &AnalysisResult,
        settings: &ReportSettings,
    ) -> Result<(), ReportError> {
        let disclaimer = &result.disclaimer;
        writeln!(output, "<h2>1. Обязательный дисклеймер</h2>")?;
        if !disclaimer.found {
            writeln!(output, "<p><strong>Статус:</strong> ❌ Не найден</p>")?;
            return Ok(());
        }

        let status = if disclaimer.exact_match {
            "✅ Найден"
        } else {
            "✅ Найден ⚠️ (текст может быть изменен)"
        };
        writeln!(output, "<p><strong>Статус:</strong> {}</p>", status)?;
        if let Some(warning) = &disclaimer.warning {
            writeln!(
                output,
                "<p><strong>Предупреждение:</strong> {}</p>",
                Self::escape_html(warning)
            )?;
        }
        writeln!(
            output,
            "<p><strong>Размер и видимость:</strong> требуют ручной проверки (не менее {}% площади)</p>",
            settings.min_size_percent
        )?;
        writeln!(
            output,
            "<pre>{}</pre>",
            Self::escape_html(&settings.disclaimer_text)
        )?;
        Ok(())
    }

    fn format_violations(
        output: &mut String,
        result: &AnalysisResult,
        settings: &ReportSettings,
    ) -> Result<(), ReportError> {
        writeln!(output, "<h2>2. Запреты (ФЗ \"О рекламе\", ст. 28.1)</h2>")?;

        for (category, evidence) in result.violations.iter() {
            writeln!(output, "<div class=\"category\" id=\"{}\">", category.as_str())?;
            writeln!(
                output,
                "    <h3>{}</h3>",
                Self::escape_html(settings.title(category))
            )?;
            if evidence.is_empty() {
                writeln!(output, "    <p>✅ Нет нарушений</p>")?;
                writeln!(output, "</div>")?;
                continue;
            }

            writeln!(
                output,
                "    <p>❌ Нарушение обнаружено ({})</p>",
                evidence.len()
            )?;
            writeln!(output, "    <ul>")?;
            for item in evidence.iter().take(MAX_LISTED_PHRASES) {
                writeln!(
                    output,
                    "        <li><strong>{}</strong><div class=\"evidence\">{}</div></li>",
                    Self::escape_html(&item.phrase),
                    Self::highlight(&item.context, &item.phrase)
                )?;
            }
            if evidence.len() > MAX_LISTED_PHRASES {
                writeln!(
                    output,
                    "        <li>и еще {}</li>",
                    evidence.len() - MAX_LISTED_PHRASES
                )?;
            }
            writeln!(output, "    </ul>")?;
            writeln!(output, "</div>")?;
        }
        Ok(())
    }

    fn format_recommendations(
        output: &mut String,
        result: &AnalysisResult,
        settings: &ReportSettings,
    ) -> Result<(), ReportError> {
        writeln!(output, "<h2>💡 Рекомендации по исправлению</h2>")?;

        let disclaimer = &result.disclaimer;
        if !disclaimer.found {
            writeln!(output, "<h3>❌ Отсутствует обязательный дисклеймер</h3>")?;
            writeln!(output, "<ol>")?;
            writeln!(output, "    <li>Добавить дисклеймер в видимую часть материала</li>")?;
            writeln!(
                output,
                "    <li>Точный текст: «{}»</li>",
                Self::escape_html(&settings.disclaimer_text)
            )?;
            writeln!(
                output,
                "    <li>Размер должен быть не менее {}% площади</li>",
                settings.min_size_percent
            )?;
            writeln!(output, "</ol>")?;
        } else if !disclaimer.exact_match {
            writeln!(output, "<h3>⚠️ Текст дисклеймера изменен</h3>")?;
            writeln!(
                output,
                "<p>Заменить дисклеймер точным текстом: «{}»</p>",
                Self::escape_html(&settings.disclaimer_text)
            )?;
        }

        if !result.violations.is_empty() {
            writeln!(output, "<h3>❌ Найдены запрещенные формулировки</h3>")?;
            writeln!(output, "<ol>")?;
            writeln!(output, "    <li>Удалить найденные запрещенные фразы</li>")?;
            writeln!(output, "    <li>Заменить на разрешенные формулировки:<ul>")?;
            for phrase in ALLOWED_PHRASES {
                writeln!(output, "        <li>✅ «{}»</li>", phrase)?;
            }
            writeln!(output, "    </ul></li>")?;
            writeln!(output, "</ol>")?;
        }

        if disclaimer.is_clean() && result.violations.is_empty() {
            writeln!(output, "<p>Исправления не требуются.</p>")?;
        }
        Ok(())
    }

    fn verdict_class(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::Compliant => "success",
            Verdict::PartialViolation => "warn",
            Verdict::NonCompliant | Verdict::CriticalViolation => "fail",
        }
    }

    /// Escape `context` and wrap the first occurrence of `phrase` in `<mark>`
    fn highlight(context: &str, phrase: &str) -> String {
        match context.find(phrase) {
            Some(pos) if !phrase.is_empty() => format!(
                "{}<mark>{}</mark>{}",
                Self::escape_html(&context[..pos]),
                Self::escape_html(phrase),
                Self::escape_html(&context[pos + phrase.len()..])
            ),
            _ => Self::escape_html(context),
        }
    }

    fn escape_html(s: &str) -> String {
        encode_safe(s).into_owned()
    }
}
