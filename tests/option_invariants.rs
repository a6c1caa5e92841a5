//! Property tests for the option rules of a decision session.

use proptest::prelude::*;

use decision_helper::application::snapshot;
use decision_helper::domain::decision::{
    DecisionSession, SessionAction, MAX_IMAGE_OPTIONS, MIN_OPTIONS,
};

const PNG_URL: &str = "data:image/png;base64,iVBORw0KGgo=";

fn option_action() -> impl Strategy<Value = SessionAction> {
    prop_oneof![
        Just(SessionAction::AddOption),
        (0usize..8).prop_map(SessionAction::RemoveOption),
        (0usize..8, "[a-z ]{0,6}")
            .prop_map(|(index, text)| SessionAction::UpdateOption { index, text }),
        (0usize..8).prop_map(|index| SessionAction::SetImageOption {
            index,
            data_url: PNG_URL.to_string(),
            raw: None,
        }),
        (0usize..8).prop_map(SessionAction::ClearImageOption),
        Just(SessionAction::SwitchToTextMode),
    ]
}

proptest! {
    #[test]
    fn option_count_never_drops_below_minimum(
        actions in prop::collection::vec(option_action(), 0..40)
    ) {
        let mut session = DecisionSession::new();
        for action in actions {
            action.apply(&mut session);
            prop_assert!(session.options().len() >= MIN_OPTIONS);
        }
    }

    #[test]
    fn options_share_one_kind_and_respect_image_cap(
        actions in prop::collection::vec(option_action(), 0..40)
    ) {
        let mut session = DecisionSession::new();
        for action in actions {
            action.apply(&mut session);
            let kind = session.option_kind();
            prop_assert!(session.options().iter().all(|o| o.kind() == kind));
            if session.is_image_mode() {
                prop_assert!(session.options().len() <= MAX_IMAGE_OPTIONS);
            }
        }
    }

    #[test]
    fn add_and_remove_alone_keep_the_floor(
        removals in prop::collection::vec(0usize..6, 0..20),
        additions in 0usize..5
    ) {
        let mut session = DecisionSession::new();
        for _ in 0..additions {
            session.add_option();
        }
        for index in removals {
            session.remove_option(index);
        }
        prop_assert!(session.options().len() >= MIN_OPTIONS);
    }

    #[test]
    fn persisted_session_restores_identically(
        context in "[a-zA-Z ]{0,20}",
        actions in prop::collection::vec(option_action(), 0..20)
    ) {
        let mut session = DecisionSession::new();
        session.set_context(context);
        for action in actions {
            action.apply(&mut session);
        }

        let restored = snapshot::decode(&snapshot::encode(&session).unwrap());
        prop_assert_eq!(restored, session);
    }
}
