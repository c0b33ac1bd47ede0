use super::AppAction;
use crate::environment::AppEnvironment;
use crate::features::auth::AuthAction;
use catalog_core::effect::Effect;
use catalog_core::{Lifecycle, Listener, Origin, SmallVec, smallvec};
use tracing::warn;

/// Signs the user out when the server answers 401
///
/// Watches every rejected request of global origin. On a 401 it dispatches
/// [`AuthAction::Logout`] and then re-dispatches the rejection tagged
/// [`Origin::Local`], so the failing feature still settles while this
/// listener ignores the replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionExpiryListener;

impl Listener<AppAction, AppEnvironment> for SessionExpiryListener {
    fn matches(&self, action: &AppAction) -> bool {
        action.origin() == Some(Origin::Global)
            && action.rejection().is_some_and(|error| error.is_unauthorized())
    }

    fn effects(&self, action: &AppAction, _env: &AppEnvironment) -> SmallVec<[Effect<AppAction>; 4]> {
        warn!("Session expired, signing out");
        metrics::counter!("session.expired.total").increment(1);
        smallvec![Effect::chain(vec![
            Effect::send(AppAction::Auth(AuthAction::Logout)),
            Effect::send(action.clone().into_local()),
        ])]
    }
}
