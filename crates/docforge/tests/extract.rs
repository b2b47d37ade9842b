//! PDF extraction against a real (hand-built) PDF file.

mod support;

use docforge::extract::PdfExtractor;
use docforge_core::extract::TextExtractor;

#[tokio::test]
async fn extracts_text_and_page_count() {
    let pdf = support::minimal_pdf("monthly spending summary");
    let extracted = PdfExtractor.extract(&pdf).await.unwrap();
    assert_eq!(extracted.page_count, 1);
    assert!(
        extracted.text.contains("monthly spending summary"),
        "got: {:?}",
        extracted.text
    );
}
