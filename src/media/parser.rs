//! Media extraction from posts.

use serde::Deserialize;
use serde_json::Value;

use crate::api::types::{GalleryData, MediaMetadataMap, Post, Preview};
use crate::media::filter::MediaPolicy;
use crate::media::item::{MediaCandidate, SkipReason};

/// Extract the media a post references, in presentation order.
///
/// Structural decoding happens up front, so a malformed gallery is reported as
/// a [`SkipReason`] instead of an empty sequence. Member resolution and the
/// policy checks run lazily as the returned iterator is consumed.
pub fn extract_media<'a>(
    post: &'a Post,
    policy: &'a MediaPolicy,
) -> Result<impl Iterator<Item = MediaCandidate> + Send + 'a, SkipReason> {
    let candidates: Box<dyn Iterator<Item = MediaCandidate> + Send + 'a> = if post.is_gallery() {
        Box::new(gallery_candidates(post)?)
    } else {
        Box::new(single_candidate(post)?)
    };

    Ok(candidates.filter(move |candidate| {
        let admitted = policy.admits(candidate);
        if !admitted {
            tracing::debug!("Filtered out {} from {}", candidate.url, post.name);
        }
        admitted
    }))
}

/// The one media link of a non-gallery post.
fn single_candidate(post: &Post) -> Result<std::iter::Once<MediaCandidate>, SkipReason> {
    let url = post
        .url_overridden_by_dest
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(SkipReason::NoMedia)?;

    Ok(std::iter::once(MediaCandidate::single(
        url,
        preview_dimensions(post.preview.as_ref()),
    )))
}

/// Size of the first preview image's source, if the post has a readable one.
fn preview_dimensions(preview: Option<&Value>) -> Option<(u32, u32)> {
    let preview = Preview::deserialize(preview?).ok()?;
    let source = &preview.images.first()?.source;
    Some((source.width, source.height))
}

/// Gallery members in declared order, skipping entries whose metadata is
/// missing, not `valid`, or has no URL.
fn gallery_candidates(
    post: &Post,
) -> Result<impl Iterator<Item = MediaCandidate> + Send, SkipReason> {
    let gallery = decode::<GalleryData>(post.gallery_data.as_ref(), "gallery_data")?;
    let metadata = decode::<MediaMetadataMap>(post.media_metadata.as_ref(), "media_metadata")?;

    let members = gallery.items.into_iter().filter_map(move |item| {
        let Some(meta) = metadata.get(&item.media_id) else {
            tracing::debug!("Gallery member {} has no metadata", item.media_id);
            return None;
        };
        if !meta.is_valid() {
            tracing::debug!(
                "Gallery member {} has status {:?}",
                item.media_id,
                meta.status
            );
            return None;
        }
        let source = meta.s.as_ref()?;
        Some((source.url()?.to_string(), source.dimensions()))
    });

    Ok(members
        .enumerate()
        .map(|(position, (url, dimensions))| {
            MediaCandidate::gallery_member(position, url, dimensions)
        }))
}

fn decode<T: for<'de> Deserialize<'de>>(value: Option<&Value>, field: &str) -> Result<T, SkipReason> {
    let value = value
        .filter(|v| !v.is_null())
        .ok_or_else(|| SkipReason::MalformedGallery(format!("missing {}", field)))?;

    T::deserialize(value).map_err(|e| SkipReason::MalformedGallery(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::filter::ContentFilter;
    use serde_json::json;

    fn post(data: Value) -> Post {
        serde_json::from_value(data).unwrap()
    }

    fn gallery_post() -> Post {
        post(json!({
            "name": "t3_gal",
            "title": "Gallery",
            "is_gallery": true,
            "gallery_data": { "items": [
                { "media_id": "m3", "id": 1 },
                { "media_id": "m1", "id": 2 },
                { "media_id": "bad", "id": 3 },
                { "media_id": "m2", "id": 4 }
            ]},
            "media_metadata": {
                "m1": { "status": "valid", "e": "Image", "s": { "u": "https://i.redd.it/m1.jpg", "x": 1920, "y": 1080 } },
                "m2": { "status": "valid", "e": "Image", "s": { "u": "https://i.redd.it/m2.jpg", "x": 3840, "y": 2160 } },
                "bad": { "status": "failed" },
                "m3": { "status": "valid", "e": "AnimatedImage", "s": { "gif": "https://i.redd.it/m3.gif", "x": 800, "y": 600 } }
            }
        }))
    }

    fn collect(post: &Post, policy: &MediaPolicy) -> Vec<MediaCandidate> {
        extract_media(post, policy).unwrap().collect()
    }

    #[test]
    fn test_single_image() {
        let post = post(json!({
            "name": "t3_one",
            "title": "One",
            "url_overridden_by_dest": "https://i.redd.it/one.png",
            "preview": { "images": [ { "source": { "url": "x", "width": 1920, "height": 1080 } } ] }
        }));

        let candidates = collect(&post, &MediaPolicy::default());
        assert_eq!(
            candidates,
            vec![MediaCandidate::single("https://i.redd.it/one.png", Some((1920, 1080)))]
        );

        let strict = MediaPolicy::new(ContentFilter::resolution(1920, 1081), false);
        assert!(collect(&post, &strict).is_empty());
    }

    #[test]
    fn test_single_without_preview_only_passes_without_filter() {
        let post = post(json!({ "name": "t3_x", "url_overridden_by_dest": "https://i.imgur.com/x.jpg" }));

        assert_eq!(collect(&post, &MediaPolicy::default()).len(), 1);
        let filtered = MediaPolicy::new(ContentFilter::aspect_ratio(16, 9), false);
        assert!(collect(&post, &filtered).is_empty());
    }

    #[test]
    fn test_self_post_has_no_media() {
        let post = post(json!({ "name": "t3_self", "title": "Discussion" }));
        assert_eq!(
            extract_media(&post, &MediaPolicy::default()).err(),
            Some(SkipReason::NoMedia)
        );
    }

    #[test]
    fn test_gallery_order_skips_invalid_members() {
        let post = gallery_post();
        let urls: Vec<(Option<usize>, String)> = collect(&post, &MediaPolicy::default())
            .into_iter()
            .map(|c| (c.position, c.url))
            .collect();

        assert_eq!(
            urls,
            vec![
                (Some(0), "https://i.redd.it/m3.gif".to_string()),
                (Some(1), "https://i.redd.it/m1.jpg".to_string()),
                (Some(2), "https://i.redd.it/m2.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_gallery_filter_keeps_positions() {
        let post = gallery_post();
        let policy = MediaPolicy::new(ContentFilter::aspect_ratio(16, 9), false);
        let positions: Vec<Option<usize>> = collect(&post, &policy)
            .into_iter()
            .map(|c| c.position)
            .collect();

        assert_eq!(positions, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_malformed_gallery() {
        let missing = post(json!({ "name": "t3_m", "is_gallery": true, "media_metadata": {} }));
        assert!(matches!(
            extract_media(&missing, &MediaPolicy::default()).err(),
            Some(SkipReason::MalformedGallery(_))
        ));

        let wrong_shape = post(json!({
            "name": "t3_w",
            "is_gallery": true,
            "gallery_data": { "items": "nope" },
            "media_metadata": {}
        }));
        assert!(matches!(
            extract_media(&wrong_shape, &MediaPolicy::default()).err(),
            Some(SkipReason::MalformedGallery(_))
        ));
    }

    #[test]
    fn test_redgifs_link_dropped_by_default() {
        let post = post(json!({
            "name": "t3_rg",
            "url_overridden_by_dest": "https://www.redgifs.com/watch/something"
        }));

        assert!(collect(&post, &MediaPolicy::default()).is_empty());
        assert_eq!(collect(&post, &MediaPolicy::new(ContentFilter::None, true)).len(), 1);
    }
}
