//! Profile commands.
//!
//! # Usage
//!
//! ```bash
//! swipey profile setup --name Ada --age 30 --gender Female --style minimal --style vintage
//! swipey profile update --age 31
//! swipey profile styles
//! swipey profile reset
//! ```

use clap::Subcommand;
use swipey_client::ClientState;
use swipey_client::error::{ClientError, Result};
use swipey_client::stores::{GENDER_OPTIONS, Profile, ProfileDraft, ProfilePatch, STYLE_OPTIONS};

use crate::output;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile
    Show,
    /// Complete onboarding
    Setup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: u32,
        /// One of: Male, Female, Other
        #[arg(long)]
        gender: String,
        /// Preferred style id, repeatable (see `swipey profile styles`)
        #[arg(long = "style")]
        styles: Vec<String>,
    },
    /// Change individual profile fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<String>,
        /// Replaces the preferred styles when given, repeatable
        #[arg(long = "style")]
        styles: Vec<String>,
    },
    /// List the selectable styles
    Styles,
    /// Start onboarding over, clearing saved items too
    Reset,
}

pub async fn run(state: &ClientState, action: ProfileAction) -> Result<()> {
    match action {
        ProfileAction::Show => {}
        ProfileAction::Setup {
            name,
            age,
            gender,
            styles,
        } => {
            let details = ProfileDraft {
                name,
                age: Some(age),
                gender,
                preferred_styles: styles,
            }
            .validate()
            .map_err(|e| ClientError::InvalidInput(e.to_string()))?;

            let mut profile = state.profile().lock().await;
            profile.update(|profile| {
                profile.set_profile(details);
                profile.mark_welcome_seen();
            })?;
        }
        ProfileAction::Update {
            name,
            age,
            gender,
            styles,
        } => {
            let patch = ProfilePatch {
                name,
                age,
                gender,
                preferred_styles: (!styles.is_empty()).then_some(styles),
            };
            if patch.is_empty() {
                return Err(ClientError::InvalidInput(
                    "nothing to update, pass at least one field".to_string(),
                ));
            }
            patch
                .validate()
                .map_err(|e| ClientError::InvalidInput(e.to_string()))?;
            state
                .profile()
                .lock()
                .await
                .update(|profile| profile.update_profile(patch))?;
        }
        ProfileAction::Styles => {
            for style in STYLE_OPTIONS {
                output::line(&format!("{:<12} {}", style.id, style.label));
            }
            output::line(&format!("Genders: {}", GENDER_OPTIONS.join(", ")));
            return Ok(());
        }
        ProfileAction::Reset => {
            state
                .profile()
                .lock()
                .await
                .update(Profile::clear_profile)?;
        }
    }

    let profile = state.profile().lock().await;
    output::profile(profile.state());
    Ok(())
}
