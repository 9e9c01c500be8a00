//! Interactive walkthrough for building the explorations in the GA4 UI.
//!
//! Reads answers line by line so it can be driven from a terminal or from
//! a script. End of input stops the walkthrough.

use std::io::{BufRead, Write};

use anyhow::Result;

use ga4_types::PropertyId;

use super::templates::{explorations, field_label, Exploration};
use crate::display::rule;

/// A card on the bonus custom report.
struct DashboardCard {
    name: &'static str,
    dimension: &'static str,
    filter: &'static str,
}

const DASHBOARD_CARDS: [DashboardCard; 3] = [
    DashboardCard {
        name: "Engagement Quality Distribution",
        dimension: "Custom parameter: engagement_quality",
        filter: "Event name = engagement_quality_score",
    },
    DashboardCard {
        name: "Top Engaging Content",
        dimension: "Custom parameter: slug",
        filter: "Event name = content_engagement",
    },
    DashboardCard {
        name: "Image Performance",
        dimension: "Custom parameter: slug",
        filter: "Event name contains image",
    },
];

/// What the user went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideSummary {
    pub started: bool,
    pub completed: Vec<String>,
    pub skipped: Vec<String>,
    pub quit: bool,
    pub dashboard: bool,
}

/// The walkthrough over any input and output.
pub struct Guide<R, W> {
    input: R,
    out: W,
    property: PropertyId,
}

enum Step {
    Continue,
    Stop,
}

impl<R: BufRead, W: Write> Guide<R, W> {
    pub fn new(input: R, out: W, property: PropertyId) -> Self {
        Self {
            input,
            out,
            property,
        }
    }

    fn header(&mut self, title: &str) -> Result<()> {
        writeln!(self.out, "\n{}\n🎯 {}\n{}", rule(60), title, rule(60))?;
        Ok(())
    }

    /// Prompt and read one trimmed, lowercased answer. `None` at end of
    /// input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    fn wait(&mut self) -> Result<Step> {
        match self.ask("\n✅ Press Enter when you've completed this step...")? {
            Some(_) => Ok(Step::Continue),
            None => Ok(Step::Stop),
        }
    }

    fn numbered(&mut self, items: &[String]) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            writeln!(self.out, "   {}. {}", i + 1, item)?;
        }
        Ok(())
    }

    /// Walk through one exploration. Returns false if input ran out.
    fn exploration(&mut self, index: usize, exploration: &Exploration) -> Result<bool> {
        self.header(&format!(
            "EXPLORATION {}: {}",
            index + 1,
            exploration.short_name()
        ))?;
        if index == 0 {
            writeln!(self.out, "🌐 Open GA4 Explore: {}", self.property.explore_url())?;
        }
        writeln!(self.out, "\n📋 Follow these steps in GA4:")?;
        writeln!(self.out, "1. Click 'Blank' to create a new exploration")?;
        writeln!(self.out, "2. Name it: '{}'", exploration.name)?;
        if let Step::Stop = self.wait()? {
            return Ok(false);
        }

        writeln!(
            self.out,
            "\n📊 Add Dimensions (drag from left panel to 'Dimensions' section):"
        )?;
        let dimensions: Vec<String> = exploration
            .dimension_labels()
            .into_iter()
            .map(|l| l.replace("Custom parameter: ", "Custom parameter → "))
            .collect();
        self.numbered(&dimensions)?;
        if let Step::Stop = self.wait()? {
            return Ok(false);
        }

        writeln!(
            self.out,
            "\n📈 Add Metrics (drag from left panel to 'Metrics' section):"
        )?;
        self.numbered(&exploration.metric_labels())?;
        if let Step::Stop = self.wait()? {
            return Ok(false);
        }

        writeln!(self.out, "\n🎯 Configure the Table:")?;
        let layout = &exploration.config.layout;
        let mut step = 1;
        for (fields, target) in [
            (&layout.rows, "ROWS"),
            (&layout.columns, "COLUMNS"),
            (&layout.values, "VALUES"),
        ] {
            for field in fields {
                writeln!(self.out, "{}. Drag '{}' to {}", step, field_label(field), target)?;
                step += 1;
            }
        }
        if let Step::Stop = self.wait()? {
            return Ok(false);
        }

        if let Some(filter) = exploration.filter() {
            writeln!(self.out, "\n🔍 Add Filter:")?;
            writeln!(self.out, "1. Click 'Add filter' at the bottom")?;
            writeln!(self.out, "2. Select '{}'", field_label(&filter.field_name))?;
            writeln!(self.out, "3. Select '{}'", filter.operation.label())?;
            writeln!(self.out, "4. Type: {}", filter.value)?;
            writeln!(self.out, "5. Click Apply")?;
            if let Step::Stop = self.wait()? {
                return Ok(false);
            }
        }

        writeln!(
            self.out,
            "✅ Exploration {} complete! Save it before moving on.",
            index + 1
        )?;
        Ok(true)
    }

    fn dashboard(&mut self) -> Result<bool> {
        self.header("BONUS: Custom Dashboard Setup")?;
        writeln!(self.out, "🌐 Open GA4 Reports: {}", self.property.home_url())?;
        writeln!(self.out, "\n📋 Create a Custom Dashboard:")?;
        writeln!(self.out, "1. Go to Reports → Library")?;
        writeln!(self.out, "2. Click 'Create custom report'")?;
        writeln!(self.out, "3. Name it: 'PRTD Engagement Dashboard'")?;
        writeln!(self.out, "\nAdd these cards:")?;

        for (i, card) in DASHBOARD_CARDS.iter().enumerate() {
            writeln!(self.out, "\n📊 Card {}: {}", i + 1, card.name)?;
            writeln!(self.out, "   Metric: Event count")?;
            writeln!(self.out, "   Dimension: {}", card.dimension)?;
            writeln!(self.out, "   Filter: {}", card.filter)?;
            if let Step::Stop = self.wait()? {
                return Ok(false);
            }
        }

        writeln!(self.out, "✅ Custom dashboard complete!")?;
        Ok(true)
    }

    /// Run the whole walkthrough.
    pub fn run(&mut self) -> Result<GuideSummary> {
        let mut summary = GuideSummary::default();
        let explorations = explorations();

        writeln!(self.out, "🎯 GUIDED GA4 EXPLORATION SETUP")?;
        writeln!(self.out, "Property ID: {}", self.property)?;
        writeln!(self.out, "{}\n", rule(60))?;
        writeln!(
            self.out,
            "This interactive guide will walk you through creating {} custom",
            explorations.len()
        )?;
        writeln!(self.out, "explorations for your content engagement analytics.\n")?;
        writeln!(self.out, "⏱️  Total setup time: ~10-15 minutes\n")?;

        match self.ask("Ready to start? (y/n): ")? {
            Some(answer) if answer == "y" => summary.started = true,
            _ => {
                writeln!(self.out, "Setup cancelled. Run the guide again when ready!")?;
                return Ok(summary);
            }
        }

        for (i, exploration) in explorations.iter().enumerate() {
            writeln!(
                self.out,
                "\n🚀 Starting Exploration {}/{}: {}",
                i + 1,
                explorations.len(),
                exploration.short_name()
            )?;
            let answer = self
                .ask("Continue? (y/s/q for yes/skip/quit): ")?
                .unwrap_or_else(|| "q".to_string());

            match answer.as_str() {
                "q" => {
                    writeln!(self.out, "Setup stopped. You can resume anytime!")?;
                    summary.quit = true;
                    break;
                }
                "s" => {
                    writeln!(self.out, "⏭️  Skipped {}", exploration.short_name())?;
                    summary.skipped.push(exploration.name.clone());
                }
                _ => {
                    if !self.exploration(i, exploration)? {
                        summary.quit = true;
                        break;
                    }
                    summary.completed.push(exploration.name.clone());
                }
            }
        }

        writeln!(self.out, "\n🎉 All explorations created!")?;
        let answer = self.ask("Create bonus custom dashboard? (y/n): ")?;
        if answer.as_deref() == Some("y") {
            summary.dashboard = self.dashboard()?;
        }

        self.header("SETUP COMPLETE!")?;
        writeln!(self.out, "✅ Your GA4 explorations are ready!")?;
        writeln!(
            self.out,
            "💡 Visit deal pages and interact with content to generate data"
        )?;
        writeln!(
            self.out,
            "📊 Check your explorations in 24-48 hours for rich analytics\n"
        )?;
        writeln!(self.out, "🔗 Quick access links:")?;
        writeln!(self.out, "   GA4 Explore: {}", self.property.explore_url())?;
        writeln!(self.out, "   GA4 Reports: {}", self.property.reports_url())?;
        writeln!(
            self.out,
            "\n🛠️  Run 'prtd-analytics engagement' anytime to check your tracking data"
        )?;

        Ok(summary)
    }
}

/// The `guide` command, on stdin/stdout.
pub fn run_guide(property: &PropertyId) -> Result<GuideSummary> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Guide::new(stdin.lock(), stdout.lock(), property.clone()).run()
}
