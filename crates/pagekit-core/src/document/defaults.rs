//! Compiled-in default site document.
//!
//! This is both the first-run content of the site and the *schema* every
//! persisted document must match (see [`ConfigDocument::conforms_to`]).

use super::node::ConfigDocument;

/// Top-level field holding the background image URL.
pub const BACKGROUND_IMAGE: &str = "backgroundImage";
/// Top-level field holding the site name shown in the header.
pub const SITE_NAME: &str = "siteName";
/// Top-level field holding the hero headline.
pub const HERO_TITLE: &str = "heroTitle";
/// Top-level field holding the hero sub-headline.
pub const HERO_SUBTITLE: &str = "heroSubtitle";
/// Top-level field holding the "about" paragraph.
pub const ABOUT_TEXT: &str = "aboutText";
/// Group of per-marketplace affiliate URLs.
pub const AFFILIATE_LINKS: &str = "affiliateLinks";

/// Marketplaces that get an affiliate link, in display order.
pub const MARKETPLACES: [&str; 6] = [
    "amazon",
    "mercadolivre",
    "magazineluiza",
    "americanas",
    "shopee",
    "aliexpress",
];

/// Builds the default site document.
pub fn default_site_document() -> ConfigDocument {
    ConfigDocument::builder()
        .leaf(
            BACKGROUND_IMAGE,
            "https://k6hrqrxuu8obbfwn.public.blob.vercel-storage.com/temp/f79ad46d-c566-4818-a01c-69ef3cdae045.jpg",
        )
        .leaf(SITE_NAME, "Meus Descontos Online")
        .leaf(HERO_TITLE, "💕 Todos os Melhores Descontos em um Só Lugar!")
        .leaf(
            HERO_SUBTITLE,
            "Acesse promoções incríveis da Amazon, Mercado Livre, Magazine Luiza, Americanas, \
             Shopee e AliExpress — tudo reunido para você aproveitar com estilo!",
        )
        .leaf(
            ABOUT_TEXT,
            "Organizamos as melhores promoções da internet para que você encontre tudo em um só \
             lugar. Economia, praticidade e charme em cada clique 💖.",
        )
        .branch(AFFILIATE_LINKS, |links| {
            MARKETPLACES.iter().fold(links, |links, market| {
                links.leaf(*market, format!("#{market}-afiliado"))
            })
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::path::FieldPath;

    #[test]
    fn test_default_document_has_every_marketplace_link() {
        let doc = default_site_document();
        for market in MARKETPLACES {
            let path = FieldPath::from_segments([AFFILIATE_LINKS, market]).unwrap();
            assert_eq!(doc.get(&path).unwrap(), format!("#{market}-afiliado"));
        }
    }

    #[test]
    fn test_default_document_has_eleven_editable_leaves() {
        // 5 top-level texts + 6 affiliate links
        assert_eq!(default_site_document().leaf_paths().len(), 11);
    }

    #[test]
    fn test_default_site_name() {
        let doc = default_site_document();
        let path = FieldPath::parse(SITE_NAME).unwrap();
        assert_eq!(doc.get(&path).unwrap(), "Meus Descontos Online");
    }

    #[test]
    fn test_default_document_conforms_to_itself() {
        let doc = default_site_document();
        assert!(doc.conforms_to(&doc));
    }
}
