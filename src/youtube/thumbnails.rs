use crate::models::ImageDescriptor;

/// Returns the URL of the image with the largest pixel area.
///
/// On equal areas the first image in iteration order wins; callers should not
/// depend on which one that is. Returns `None` only when there are no images.
pub fn best_thumbnail_url<'a, I>(images: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a ImageDescriptor>,
{
    let mut best: Option<(&ImageDescriptor, u64)> = None;

    for image in images {
        let area = u64::from(image.width) * u64::from(image.height);
        match best {
            Some((_, best_area)) if best_area >= area => {}
            _ => best = Some((image, area)),
        }
    }

    best.map(|(image, _)| image.url.as_str())
}
