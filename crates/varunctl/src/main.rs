use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use varun_core::{
    api::{ApiResponse, AssessmentRecord, AssessmentRequest},
    calculate_feasibility, AssessmentInput, FeasibilityResult, RoofType, SoilType,
};

#[derive(Parser, Debug)]
#[command(name = "varunctl", version, about = "Rainwater harvesting feasibility tool")]
struct Args {
    /// Log level (env-filter syntax).
    #[arg(long, default_value = "warn", global = true)]
    log: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the feasibility calculation locally.
    Assess {
        /// Roof area in square feet.
        #[arg(long)]
        roof_area: f64,
        /// Annual rainfall in millimeters.
        #[arg(long)]
        annual_rainfall: f64,
        /// sandy, loamy, clayey, rocky or mixed.
        #[arg(long, default_value = "mixed")]
        soil_type: String,
        /// concrete, tile, sheet or thatched.
        #[arg(long, default_value = "concrete")]
        roof_type: String,
        /// Household occupants.
        #[arg(long)]
        people: u32,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Submit an assessment request file to the daemon.
    Submit {
        #[arg(long)]
        daemon: String,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        file: String,
    },
    /// List the user's stored assessments.
    List {
        #[arg(long)]
        daemon: String,
        #[arg(long)]
        user_id: String,
    },
    /// Fetch one stored assessment.
    Get {
        #[arg(long)]
        daemon: String,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        id: String,
    },
}

const USER_ID_HEADER: &str = "x-user-id";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = reqwest::Client::new();

    match args.cmd {
        Cmd::Assess {
            roof_area,
            annual_rainfall,
            soil_type,
            roof_type,
            people,
            json,
        } => {
            let input = AssessmentInput {
                roof_area,
                annual_rainfall,
                soil_type: SoilType::from(soil_type),
                roof_type: RoofType::from(roof_type),
                number_of_people: people,
            };
            if !input.soil_type.is_known() {
                tracing::warn!(soil_type = %input.soil_type, "unrecognized soil type, using default recharge factor");
            }
            let result = calculate_feasibility(&input);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_summary(&result));
            }
        }
        Cmd::Submit {
            daemon,
            user_id,
            file,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("read {file}"))?;
            let req: AssessmentRequest = serde_json::from_slice(&bytes).context("parse json")?;
            let url = format!("{}/api/assessments", daemon.trim_end_matches('/'));
            tracing::debug!(%url, "submitting assessment");
            let resp = client
                .post(url)
                .header(USER_ID_HEADER, &user_id)
                .json(&req)
                .send()
                .await?;
            let body: ApiResponse<AssessmentRecord> = read_envelope(resp).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Cmd::List { daemon, user_id } => {
            let url = format!("{}/api/assessments", daemon.trim_end_matches('/'));
            let resp = client
                .get(url)
                .header(USER_ID_HEADER, &user_id)
                .send()
                .await?;
            let body: ApiResponse<Vec<AssessmentRecord>> = read_envelope(resp).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Cmd::Get {
            daemon,
            user_id,
            id,
        } => {
            let url = format!("{}/api/assessments/{}", daemon.trim_end_matches('/'), id);
            let resp = client
                .get(url)
                .header(USER_ID_HEADER, &user_id)
                .send()
                .await?;
            let body: ApiResponse<AssessmentRecord> = read_envelope(resp).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

/// Decodes the daemon's envelope, turning `success: false` into an error with its message.
async fn read_envelope<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> anyhow::Result<ApiResponse<T>> {
    let status = resp.status();
    let body: ApiResponse<T> = resp
        .json()
        .await
        .with_context(|| format!("decode response (HTTP {status})"))?;
    if !body.success {
        let mut msg = body.message.clone().unwrap_or_else(|| "request failed".into());
        for e in body.errors.iter().flatten() {
            msg.push_str(&format!("\n  {}: {}", e.field, e.message));
        }
        bail!("HTTP {status}: {msg}");
    }
    Ok(body)
}

fn render_summary(r: &FeasibilityResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Feasibility:        {} ({})\n",
        r.feasibility_score, r.feasibility_status
    ));
    out.push_str(&format!("Harvest potential:  {} L/year\n", r.potential_harvest_volume));
    out.push_str(&format!("Recharge potential: {} L/year\n", r.recharge_potential));
    out.push_str(&format!("Water saved:        {} L/year\n", r.water_saved));
    out.push_str(&format!(
        "Cost:               {} install + {} maintenance = {}\n",
        r.estimated_cost.installation, r.estimated_cost.maintenance, r.estimated_cost.total
    ));
    out.push_str(&format!(
        "ROI:                {} years ({} saved per year)\n",
        r.roi.years, r.roi.savings_per_year
    ));
    out.push_str(&format!(
        "System:             {} L tank, {}, {} pipes\n",
        r.system_design.tank_capacity, r.system_design.filter_type, r.system_design.pipe_size
    ));
    for rec in &r.recommendations {
        out.push_str(&format!("  [{:?}] {}: {}\n", rec.priority, rec.title, rec.description));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_score_and_recommendations() {
        let result = calculate_feasibility(&AssessmentInput {
            roof_area: 100.0,
            annual_rainfall: 1000.0,
            soil_type: SoilType::Sandy,
            roof_type: RoofType::Concrete,
            number_of_people: 4,
        });
        let text = render_summary(&result);
        assert!(text.contains("90 (highly_feasible)"));
        assert!(text.contains("[High] Excellent Potential"));
        assert!(text.contains("18000 L tank, Multi-stage filtration, 3 inch pipes"));
    }

    #[test]
    fn cli_parses_assess_flags() {
        let args = Args::try_parse_from([
            "varunctl",
            "assess",
            "--roof-area",
            "120",
            "--annual-rainfall",
            "800",
            "--soil-type",
            "loamy",
            "--people",
            "3",
        ])
        .unwrap();
        match args.cmd {
            Cmd::Assess {
                roof_area,
                soil_type,
                roof_type,
                json,
                ..
            } => {
                assert_eq!(roof_area, 120.0);
                assert_eq!(soil_type, "loamy");
                assert_eq!(roof_type, "concrete");
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
