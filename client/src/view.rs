//! What a page shows for a given slice status.

use crate::routes::Route;
use catalog_core::{ApiError, AsyncSlice, RequestStatus};

/// What the rendering layer should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Loading overlay
    Loading,
    /// Not-found page
    NotFound,
    /// Leave the page
    Redirect(Route),
    /// Page content with an inline error
    Banner(String),
    /// Page content
    Ready,
}

/// Presentation state of one page
///
/// Until the page's first successful load, anything but an error shows the
/// loading overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    initial_load: bool,
    detail: bool,
}

impl PageView {
    /// A list or form page; 404 shows as a banner
    #[must_use]
    pub const fn page() -> Self {
        Self {
            initial_load: true,
            detail: false,
        }
    }

    /// A detail page; 404 shows the not-found page
    #[must_use]
    pub const fn detail() -> Self {
        Self {
            initial_load: true,
            detail: true,
        }
    }

    /// True until the first successful load
    #[must_use]
    pub const fn is_initial_load(&self) -> bool {
        self.initial_load
    }

    /// Decide what to show for `slice`
    pub fn present<D>(&mut self, slice: &AsyncSlice<D>) -> Presentation {
        self.present_status(slice.status, slice.error.as_ref())
    }

    /// Decide what to show for a status and error
    pub fn present_status(&mut self, status: RequestStatus, error: Option<&ApiError>) -> Presentation {
        if status == RequestStatus::Succeeded {
            self.initial_load = false;
        }

        if let Some(error) = error.filter(|_| status == RequestStatus::Failed) {
            if error.is_unauthorized() {
                return Presentation::Redirect(Route::Login);
            }
            if error.is_not_found() && self.detail {
                return Presentation::NotFound;
            }
            return Presentation::Banner(error.message.clone());
        }

        if self.initial_load || status == RequestStatus::Loading {
            Presentation::Loading
        } else {
            Presentation::Ready
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_until_first_success() {
        let mut view = PageView::detail();

        assert_eq!(view.present_status(RequestStatus::Idle, None), Presentation::Loading);
        assert_eq!(view.present_status(RequestStatus::Succeeded, None), Presentation::Ready);
        assert!(!view.is_initial_load());
        assert_eq!(view.present_status(RequestStatus::Loading, None), Presentation::Loading);
    }

    #[test]
    fn errors_by_status() {
        let missing = ApiError::new("Not found", 404);
        let expired = ApiError::new("Unauthorized", 401);
        let broken = ApiError::new("Boom", 500);

        assert_eq!(
            PageView::detail().present_status(RequestStatus::Failed, Some(&missing)),
            Presentation::NotFound
        );
        assert_eq!(
            PageView::page().present_status(RequestStatus::Failed, Some(&missing)),
            Presentation::Banner("Not found".to_string())
        );
        assert_eq!(
            PageView::page().present_status(RequestStatus::Failed, Some(&expired)),
            Presentation::Redirect(Route::Login)
        );
        assert_eq!(
            PageView::page().present_status(RequestStatus::Failed, Some(&broken)),
            Presentation::Banner("Boom".to_string())
        );
    }
}
