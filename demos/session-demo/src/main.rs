//! Session demo: restore or log in, touch the session, print the team grid.
//!
//! ```text
//! TASKFLOW_SUPABASE_URL=https://xyz.supabase.co \
//! TASKFLOW_SUPABASE_KEY=... \
//! cargo run -p session-demo -- ada@taskflow.dev secret
//! ```
//!
//! Without the environment variables the demo runs offline against a
//! built-in member list and a session file in the current directory.

use taskflow::prelude::*;

// ---------------------------------------------------------------------------
// Offline fixtures
// ---------------------------------------------------------------------------

fn offline_members() -> Vec<Member> {
    [
        ("1", "ada@taskflow.dev", "Ada Lovelace", "Admin"),
        ("2", "grace@taskflow.dev", "Grace Hopper", "Developer"),
        ("3", "alan@taskflow.dev", "Alan Turing", "Designer"),
    ]
    .into_iter()
    .map(|(id, email, name, role)| Member {
        id: MemberId::from(id),
        email: email.into(),
        password: "secret".into(),
        name: name.into(),
        avatar_url: format!("https://i.pravatar.cc/150?u={id}"),
        role: role.into(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Session walk-through
// ---------------------------------------------------------------------------

async fn run<D: Directory + Clone>(
    mut client: TaskflowClient<D, JsonFileStore, SystemClock>,
    email: &str,
    password: &str,
) {
    let state = client.restore().await;
    println!("restore: {state}");

    if !state.is_authenticated() && !client.login(email, password).await {
        println!("login failed for {email}");
        return;
    }

    if let Some(user) = client.current_user().await {
        println!("signed in as {} <{}> ({})", user.name, user.email, user.role);
    }
    client.record_activity(ActivityKind::KeyPress);

    let members = match client.members().await {
        Ok(members) => members,
        Err(e) => {
            tracing::warn!(error = %e, "member list unavailable");
            Vec::new()
        }
    };
    let lookup = Lookup::new(members, Vec::new());
    let grid = Paginator::new(GridKind::Team.rows(&lookup, &[]));
    println!(
        "team: {} members, page {}/{}",
        grid.len(),
        grid.current_page(),
        grid.total_pages()
    );
    for row in grid.page_items() {
        match serde_json::to_string(row) {
            Ok(json) => println!("  {json}"),
            Err(e) => tracing::warn!(error = %e, "row did not serialize"),
        }
    }

    client.shutdown();
}

#[tokio::main]
async fn main() -> Result<(), TaskflowError> {
    taskflow::init_tracing();

    let mut args = std::env::args().skip(1);
    let email = args.next().unwrap_or_else(|| "ada@taskflow.dev".into());
    let password = args.next().unwrap_or_else(|| "secret".into());

    match TaskflowConfig::from_env() {
        Ok(config) => {
            let client = TaskflowClient::from_config(&config)?;
            run(client, &email, &password).await;
        }
        Err(e) => {
            tracing::info!(reason = %e, "running offline");
            let config = TaskflowConfig::default();
            let store = JsonFileStore::open(&config.store_path)?;
            let manager = SessionManager::with_system_clock(
                StaticDirectory::new(offline_members()),
                store,
                config.session_config(),
            );
            run(TaskflowClient::new(manager), &email, &password).await;
        }
    }

    Ok(())
}
