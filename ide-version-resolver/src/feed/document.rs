use crate::error::FetchError;
use crate::version::Edition;
use roxmltree::{Document, Node};

/// Extract `/products/product[@name]/channel[@id]/build[1]/@version` for the
/// given edition.
pub fn latest_stable_from_document(document: &str, edition: Edition) -> Result<String, FetchError> {
    let document = Document::parse(document)?;
    let product_name = edition.product_name();
    let channel_id = edition.release_channel();

    let root = document.root_element();
    let version = Some(root)
        .filter(|node| node.has_tag_name("products"))
        .into_iter()
        .flat_map(|products| children_with(products, "product", "name", product_name))
        .flat_map(|product| children_with(product, "channel", "id", channel_id))
        .find_map(|channel| channel.children().find(|node| node.has_tag_name("build")))
        .and_then(|build| build.attribute("version"))
        .map(str::trim)
        .filter(|version| !version.is_empty());

    match version {
        Some(version) => Ok(version.to_owned()),
        None => Err(FetchError::MissingNode(format!(
            "/products/product[@name='{}']/channel[@id='{}']/build",
            product_name, channel_id
        ))),
    }
}

fn children_with<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'static str,
    attribute: &'static str,
    value: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    parent
        .children()
        .filter(move |node| node.has_tag_name(tag) && node.attribute(attribute) == Some(value))
}
