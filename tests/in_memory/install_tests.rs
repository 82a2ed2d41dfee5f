//! Install prompt flow through the orchestrator.

use super::helpers::{orchestrator, platform, started};
use letz_client::pwa::adapters::memory::{InMemoryInstallSource, InMemoryPlatform};
use letz_client::pwa::domain::{InstallChoice, InstallationState};
use letz_client::pwa::ports::InstallEvent;
use letz_client::pwa::services::PlatformEvent;
use rstest::rstest;

#[rstest]
#[tokio::test]
async fn second_install_while_prompting_returns_false(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    let (token, gate) = platform.install.gated_token(InstallChoice::Accepted);
    orchestrator
        .dispatch(PlatformEvent::Install(InstallEvent::Eligible(token)))
        .await;

    let (first, second) = tokio::join!(orchestrator.install(), async {
        let second = orchestrator.install().await;
        gate.notify_one();
        second
    });

    assert!(first);
    assert!(!second);
    assert_eq!(platform.install.prompts_shown(), 1);
    assert_eq!(
        orchestrator.state().installation_state,
        InstallationState::Installed
    );
}

#[rstest]
#[tokio::test]
async fn install_without_eligibility_is_a_no_op(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;

    assert!(!orchestrator.install().await);
    assert_eq!(platform.install.prompts_shown(), 0);
    assert_eq!(
        orchestrator.state().installation_state,
        InstallationState::NotInstallable
    );
}

#[rstest]
#[case(InstallChoice::Accepted, true, InstallationState::Installed, false)]
#[case(InstallChoice::Dismissed, false, InstallationState::Dismissed, true)]
#[tokio::test]
async fn queued_eligibility_enables_install(
    platform: InMemoryPlatform,
    #[case] choice: InstallChoice,
    #[case] expected: bool,
    #[case] final_state: InstallationState,
    #[case] installable_after: bool,
) {
    let orchestrator = started(&platform).await;
    platform.install.announce_eligible(choice);
    orchestrator.process_pending_events().await;
    assert!(orchestrator.state().is_installable);

    assert_eq!(orchestrator.install().await, expected);

    let state = orchestrator.state();
    assert_eq!(state.installation_state, final_state);
    assert_eq!(state.is_installed, expected);
    assert_eq!(state.is_installable, installable_after);
}

#[rstest]
#[tokio::test]
async fn declined_prompt_needs_fresh_eligibility(platform: InMemoryPlatform) {
    let orchestrator = started(&platform).await;
    platform.install.announce_eligible(InstallChoice::Dismissed);
    orchestrator.process_pending_events().await;

    assert!(!orchestrator.install().await);
    assert!(orchestrator.state().is_installable);
    assert!(!orchestrator.install().await);
    assert_eq!(platform.install.prompts_shown(), 1);

    platform.install.announce_eligible(InstallChoice::Accepted);
    orchestrator.process_pending_events().await;

    assert!(orchestrator.install().await);
    assert_eq!(platform.install.prompts_shown(), 2);
}

#[tokio::test]
async fn standalone_launch_reports_installed() {
    let platform = InMemoryPlatform::new().with_install_source(InMemoryInstallSource::standalone());
    let orchestrator = orchestrator(&platform);

    let state = orchestrator.start().await;

    assert!(state.is_installed);
    assert!(!orchestrator.install().await);
}
