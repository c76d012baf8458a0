//! Markdown reporter

use std::fmt::Write;

use shared_types::{AnalysisResult, DisclaimerStatus};

use super::{Report, ReportSettings, ALLOWED_PHRASES, LEGAL_BASIS, MAX_LISTED_PHRASES};
use crate::error::ReportError;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn format(report: &Report<'_>, settings: &ReportSettings) -> Result<String, ReportError> {
        let result = report.result;
        let mut output = String::new();

        writeln!(output, "# 🔍 РЕКЛАМНЫЙ ИНСПЕКТОР | Проверка рекламы банкротства")?;
        writeln!(output)?;
        writeln!(output, "**Дата проверки:** {}", report.checked_on.format("%d.%m.%Y"))?;
        writeln!(output, "**Материал:** {}", report.material)?;
        writeln!(output, "**Тип материала:** {}", result.material_type.label())?;
        writeln!(output)?;
        writeln!(output, "---")?;
        writeln!(output)?;
        writeln!(output, "## 📊 ВЕРДИКТ")?;
        writeln!(output)?;
        writeln!(output, "{} {}", result.verdict.marker(), result.verdict.label())?;
        writeln!(output)?;
        writeln!(output, "Найдено запрещенных формулировок: {}", result.total_violations)?;
        writeln!(output)?;

        Self::format_disclaimer(&mut output, &result.disclaimer, settings)?;
        Self::format_violations(&mut output, result, settings)?;
        Self::format_recommendations(&mut output, result, settings)?;
        Self::format_legal_basis(&mut output)?;

        Ok(output)
    }

    fn format_disclaimer(
        output: &mut String,
        disclaimer: &DisclaimerStatus,
        settings: &ReportSettings,
    ) -> Result<(), ReportError> {
        writeln!(output, "## 1️⃣ ОБЯЗАТЕЛЬНЫЙ ДИСКЛЕЙМЕР")?;
        writeln!(output)?;

        if disclaimer.found {
            write!(output, "**Статус:** ✅ Найден")?;
            if !disclaimer.exact_match {
                write!(output, " ⚠️ (текст может быть изменен)")?;
            }
            writeln!(output)?;
            writeln!(output)?;
            if let Some(warning) = &disclaimer.warning {
                writeln!(output, "**Предупреждение:** {}", warning)?;
                writeln!(output)?;
            }
            writeln!(
                output,
                "**Размер и видимость:** требуют ручной проверки (не менее {}% площади)",
                settings.min_size_percent
            )?;
            writeln!(output)?;
            writeln!(output, "**Текст дисклеймера:**")?;
            writeln!(output, "```")?;
            writeln!(output, "{}", settings.disclaimer_text)?;
            writeln!(output, "```")?;
        } else {
            writeln!(output, "**Статус:** ❌ Не найден")?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_violations(
        output: &mut String,
        result: &AnalysisResult,
        settings: &ReportSettings,
    ) -> Result<(), ReportError> {
        writeln!(output, "## 2️⃣ ЗАПРЕТЫ (ФЗ \"О рекламе\", ст. 28.1)")?;
        writeln!(output)?;

        for (category, evidence) in result.violations.iter() {
            writeln!(output, "### {}", settings.title(category))?;
            if evidence.is_empty() {
                writeln!(output, "**Статус:** ✅ Нет нарушений")?;
                writeln!(output)?;
                continue;
            }

            writeln!(output, "**Статус:** ❌ Нарушение обнаружено ({})", evidence.len())?;
            writeln!(output)?;
            writeln!(output, "**Найденные формулировки:**")?;
            for item in evidence.iter().take(MAX_LISTED_PHRASES) {
                writeln!(output, "- \"{}\": …{}…", item.phrase, item.context)?;
            }
            if evidence.len() > MAX_LISTED_PHRASES {
                writeln!(output, "- и еще {}", evidence.len() - MAX_LISTED_PHRASES)?;
            }
            writeln!(output)?;
        }
        Ok(())
    }

    fn format_recommendations(
        output: &mut String,
        result: &AnalysisResult,
        settings: &ReportSettings,
    ) -> Result<(), ReportError> {
        writeln!(output, "## 💡 РЕКОМЕНДАЦИИ ПО ИСПРАВЛЕНИЮ")?;
        writeln!(output)?;

        let disclaimer = &result.disclaimer;
        if !disclaimer.found {
            writeln!(output, "### ❌ Проблема: Отсутствует обязательный дисклеймер")?;
            writeln!(output)?;
            writeln!(output, "**Как исправить:**")?;
            writeln!(output, "1. Добавить дисклеймер в видимую часть материала")?;
            writeln!(output, "2. Точный текст: \"{}\"", settings.disclaimer_text)?;
            writeln!(
                output,
                "3. Размер должен быть не менее {}% площади",
                settings.min_size_percent
            )?;
            writeln!(output)?;
        } else if !disclaimer.exact_match {
            writeln!(output, "### ⚠️ Проблема: Текст дисклеймера изменен")?;
            writeln!(output)?;
            writeln!(output, "**Как исправить:**")?;
            writeln!(output, "1. Заменить дисклеймер точным текстом: \"{}\"", settings.disclaimer_text)?;
            writeln!(output)?;
        }

        if !result.violations.is_empty() {
            let categories: Vec<&str> = result
                .violations
                .violated()
                .map(|(category, _)| settings.title(category))
                .collect();
            writeln!(output, "### ❌ Проблема: Найдены запрещенные формулировки")?;
            writeln!(output)?;
            writeln!(output, "Категории: {}", categories.join("; "))?;
            writeln!(output)?;
            writeln!(output, "**Как исправить:**")?;
            writeln!(output, "1. Удалить найденные запрещенные фразы")?;
            writeln!(output, "2. Заменить на разрешенные формулировки:")?;
            for phrase in ALLOWED_PHRASES {
                writeln!(output, "   ✅ \"{}\"", phrase)?;
            }
            writeln!(output)?;
        }

        if disclaimer.is_clean() && result.violations.is_empty() {
            writeln!(output, "Исправления не требуются.")?;
            writeln!(output)?;
        }
        Ok(())
    }

    fn format_legal_basis(output: &mut String) -> Result<(), ReportError> {
        writeln!(output, "## 📚 НОРМАТИВНАЯ БАЗА")?;
        writeln!(output)?;
        for statute in LEGAL_BASIS {
            writeln!(output, "- {}", statute)?;
        }
        writeln!(output)?;
        writeln!(output, "---")?;
        Ok(())
    }
}
