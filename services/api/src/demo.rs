use crate::infra::{seeded_sources, DEMO_APPLICANT, DEMO_RECRUITER};
use clap::Args;
use placement_hub::tracking::{
    ActorContext, ActorRole, ApplicationTracker, CanonicalStatus, NormalizedApplication,
    ViewOptions,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Aggregate as this role (recruiter or applicant).
    #[arg(long, value_parser = crate::infra::parse_role, default_value = "applicant")]
    pub(crate) role: ActorRole,
    /// Identity behind the pass. Defaults to the seeded account for the role.
    #[arg(long)]
    pub(crate) identity: Option<String>,
    /// Search term for the filtered-view portion of the demo.
    #[arg(long, default_value = "intern")]
    pub(crate) search: String,
    /// Status written to every selected application in the bulk portion.
    #[arg(long, default_value = "interviewed")]
    pub(crate) bulk_status: String,
    /// Skip the bulk status update portion of the demo.
    #[arg(long)]
    pub(crate) skip_bulk: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) {
    let DemoArgs {
        role,
        identity,
        search,
        bulk_status,
        skip_bulk,
    } = args;

    let identity = identity.unwrap_or_else(|| {
        match role {
            ActorRole::Recruiter => DEMO_RECRUITER,
            ActorRole::Applicant => DEMO_APPLICANT,
        }
        .to_string()
    });
    let actor = match role {
        ActorRole::Recruiter => ActorContext::recruiter(identity.clone()),
        ActorRole::Applicant => ActorContext::applicant(identity.clone()),
    };

    let (directs, internships) = seeded_sources();
    let tracker = ApplicationTracker::new(directs, internships);

    println!("Application tracking demo");
    println!(
        "Aggregating as {} ({identity})",
        match role {
            ActorRole::Recruiter => "recruiter",
            ActorRole::Applicant => "applicant",
        }
    );

    let records = tracker.aggregate(&actor).await;
    println!("\nUnified board ({} applications, newest first)", records.len());
    for record in &records {
        println!("- {}", describe(record));
    }

    println!("\nStatus breakdown");
    for entry in tracker.status_summary() {
        println!("- {}: {}", entry.status, entry.count);
    }

    if let Some(first) = records.first() {
        if let Some(raw) = tracker.raw_payload(&first.id) {
            match serde_json::to_string_pretty(&raw) {
                Ok(json) => println!("\nPreserved source payload for {}:\n{json}", first.id.0),
                Err(err) => println!("\nPreserved source payload unavailable: {err}"),
            }
        }
    }

    let options = ViewOptions {
        search: Some(search.clone()),
        ..ViewOptions::default()
    };
    let visible = tracker.view(&options);
    println!("\nFiltered view (search '{search}'): {} match(es)", visible.len());
    for record in &visible {
        println!("- {}", describe(record));
    }

    if skip_bulk {
        return;
    }

    let selected = tracker.select_visible(&options);
    println!("\nSelected {} visible application(s) for a bulk update", selected.len());

    let status = CanonicalStatus::parse(&bulk_status);
    let report = tracker.set_status_selected(status.clone()).await;
    println!(
        "Bulk update to '{status}': {} attempted, {} updated, {} failed{}",
        report.attempted,
        report.updated.len(),
        report.failed.len(),
        if report.reloaded {
            ", board reloaded"
        } else {
            ""
        }
    );
    for failure in &report.failed {
        println!("  - {}: {}", failure.id.0, failure.reason);
    }

    println!("\nBoard after the bulk update");
    for record in tracker.records() {
        println!("- {}", describe(&record));
    }
}

fn describe(record: &NormalizedApplication) -> String {
    let applicant = record.display_name.as_deref().unwrap_or("(no name)");
    let date = record
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    format!(
        "{} | {} @ {} | {} | {} | {} | {}",
        record.id.0,
        record.position_title,
        record.company_name,
        applicant,
        record.position_type.label(),
        record.status,
        date
    )
}
