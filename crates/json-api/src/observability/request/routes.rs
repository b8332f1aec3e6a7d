//! Route labels for spans and metrics.

use uuid::Uuid;

/// Replaces identifier segments so every order, product or cart line shares
/// one label: `/orders/{uuid}/cancel`.
pub(super) fn route_label(path: &str) -> String {
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() {
        return "/".to_owned();
    }

    trimmed
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .fold(String::new(), |mut label, segment| {
            label.push('/');
            label.push_str(segment);
            label
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_collapse() {
        let path = format!("/orders/{}/cancel", Uuid::now_v7());

        assert_eq!(route_label(&path), "/orders/{uuid}/cancel");
    }

    #[test]
    fn static_paths_are_unchanged() {
        assert_eq!(route_label("/cart/lines"), "/cart/lines");
        assert_eq!(route_label("/"), "/");
    }
}
