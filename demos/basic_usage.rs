use docsearch::SearchEngine;

fn main() {
    println!("=== docsearch Basic Usage Example ===\n");

    let mut engine = SearchEngine::new();

    println!("Adding documents...");

    let sources = [
        (
            "rust.txt",
            "Rust is a systems programming language that runs blazingly fast, prevents segfaults, and guarantees thread safety.",
        ),
        (
            "go.txt",
            "Go is an open source programming language that makes it easy to build simple, reliable, and efficient software.",
        ),
        (
            "python.txt",
            "Python is a programming language that lets you work quickly and integrate systems more effectively.",
        ),
        ("haskell.txt", "Haskell is purely functional."),
        ("empty.txt", "... !!! ???"),
    ];

    for (name, text) in sources {
        match engine.add_document(name, text) {
            Some(id) => println!("  [{}] {}", id, name),
            None => println!("  skipped {} (no searchable terms)", name),
        }
    }
    println!("✓ Indexed {} documents\n", engine.document_count());

    // Rare terms outweigh terms that appear almost everywhere
    for query in ["systems", "programming language", "thread safety", "cobol", ""] {
        println!("--- Search for '{}' ---", query);
        let results = engine.search(query);

        if results.is_empty() {
            println!("No matches found.\n");
            continue;
        }

        for (i, result) in results.iter().enumerate() {
            println!(
                "{}. [Score: {:.4}] {} ({} words)",
                i + 1,
                result.score,
                result.filename,
                result.total_words
            );
            println!("   {}", result.snippet(60));
        }
        println!();
    }

    let stats = engine.stats();
    println!("--- Index Statistics ---");
    println!("Total documents: {}", stats.total_documents);
    println!("Total terms: {}", stats.total_terms);
    println!("Avg docs per term: {:.2}", stats.avg_docs_per_term);
}
