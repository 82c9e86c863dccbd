use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use profitsim_core::numbers::floor_to_index;
use profitsim_core::{
    CostLine, HistogramBucket, InputProfile, PercentilePoint, PercentileValue, RevenueSegment,
    SimulationSummary,
};

const BAR_WIDTH: f64 = 40.0;

fn money(millions: f64) -> String {
    format!("${millions:.2}M")
}

fn segment_headline(segment: RevenueSegment) -> &'static str {
    match segment {
        RevenueSegment::Startup => "Cash-flow stage: every point of OpEx counts",
        RevenueSegment::Growth => "Growth stage: scale efficiently before the ceiling",
        RevenueSegment::Enterprise => "Enterprise stage: operational excellence protects share",
    }
}

pub fn write_console_report(
    out: &mut dyn Write,
    profile: &InputProfile,
    summary: &SimulationSummary,
    days: u32,
    elapsed: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Savings Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=============================".cyan())?;
    writeln!(
        out,
        "Profile: revenue {} · OpEx {:.1}% · AI {} · outsourcing {} · maturity {:.0}% · tech {:.1}%",
        money(profile.revenue_millions),
        profile.opex_percent,
        profile.ai_readiness,
        profile.outsourcing,
        profile.process_maturity_percent,
        profile.tech_spend_percent
    )?;
    writeln!(out, "{}", segment_headline(summary.segment).italic())?;
    writeln!(out, "Current OpEx: {}", money(summary.current_opex))?;
    writeln!(
        out,
        "Scenarios: {} (seed {})  in {elapsed:?}",
        summary.sample_count,
        summary
            .seed
            .map_or_else(|| "unseeded".to_string(), |s| s.to_string())
    )?;
    writeln!(out)?;

    writeln!(out, "{}", "🎯 Savings Range".bright_yellow().bold())?;
    let rows: [(&str, PercentileValue); 3] = [
        ("P10 conservative", summary.p10),
        ("P50 likely", summary.p50),
        ("P90 optimistic", summary.p90),
    ];
    for (label, value) in rows {
        writeln!(
            out,
            "  {label:18} {:>6.1}%  = {} / year",
            value.percent,
            money(value.amount).green()
        )?;
    }
    let extra: Vec<&PercentilePoint> = summary
        .percentiles
        .iter()
        .filter(|p| !profitsim_core::DEFAULT_QUANTILES.contains(&p.quantile))
        .collect();
    for point in extra {
        writeln!(
            out,
            "  Q{:<17.2} {:>6.1}%  = {} / year",
            point.quantile,
            point.value.percent,
            money(point.value.amount)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "📈 Distribution".bright_yellow().bold())?;
    for bucket in &summary.histogram {
        writeln!(out, "  {}", histogram_row(bucket))?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "🏢 OpEx Breakdown".bright_yellow().bold())?;
    for line in &summary.breakdown {
        writeln!(out, "  {:12} {}", line.category.to_string(), money(line.amount))?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "⏳ Cost of Inaction".bright_red().bold())?;
    writeln!(
        out,
        "  {} / day, {} after {days} days",
        money(summary.daily_cost_of_inaction).red(),
        money(summary.cost_of_inaction(days))
    )?;
    Ok(())
}

fn histogram_row(bucket: &HistogramBucket) -> String {
    let filled = (bucket.probability / 100.0 * BAR_WIDTH).round();
    let bar: String = std::iter::repeat_n('█', floor_to_index(filled)).collect();
    format!(
        "{:>12} {:>5.1}% {}",
        bucket.range_label,
        bucket.probability,
        bar.blue()
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    profile: &'a InputProfile,
    #[serde(flatten)]
    summary: &'a SimulationSummary,
}

pub fn write_json_report(
    out: &mut dyn Write,
    profile: &InputProfile,
    summary: &SimulationSummary,
    include_scenarios: bool,
) -> Result<()> {
    let trimmed;
    let summary = if include_scenarios {
        summary
    } else {
        trimmed = SimulationSummary {
            scenarios: Vec::new(),
            ..summary.clone()
        };
        &trimmed
    };
    let json_output = serde_json::to_string_pretty(&JsonReport { profile, summary })?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn write_markdown_report(
    out: &mut dyn Write,
    profile: &InputProfile,
    summary: &SimulationSummary,
    days: u32,
) -> Result<()> {
    writeln!(out, "# Savings Simulation Results\n")?;
    writeln!(out, "## Profile\n")?;
    writeln!(out, "- **Revenue**: {}", money(profile.revenue_millions))?;
    writeln!(out, "- **OpEx**: {:.1}% of revenue", profile.opex_percent)?;
    writeln!(out, "- **AI readiness**: {}", profile.ai_readiness)?;
    writeln!(out, "- **Outsourcing**: {}", profile.outsourcing)?;
    writeln!(out, "- **Segment**: {}", summary.segment)?;
    writeln!(out, "- **Scenarios**: {}\n", summary.sample_count)?;

    writeln!(out, "## Savings Range\n")?;
    writeln!(out, "| Quantile | Savings % | Amount / year |")?;
    writeln!(out, "|---|---|---|")?;
    for point in &summary.percentiles {
        writeln!(
            out,
            "| P{:.0} | {:.1}% | {} |",
            point.quantile * 100.0,
            point.value.percent,
            money(point.value.amount)
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Distribution\n")?;
    writeln!(out, "| Range | Count | Probability |")?;
    writeln!(out, "|---|---|---|")?;
    for bucket in &summary.histogram {
        writeln!(
            out,
            "| {} | {} | {:.1}% |",
            bucket.range_label, bucket.count, bucket.probability
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## OpEx Breakdown ({})\n", money(summary.current_opex))?;
    for CostLine { category, amount } in &summary.breakdown {
        writeln!(out, "- **{category}**: {}", money(*amount))?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Delaying {days} days forgoes about {} at the median estimate.",
        money(summary.cost_of_inaction(days))
    )?;
    Ok(())
}
