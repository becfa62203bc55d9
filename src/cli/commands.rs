use crate::config::Settings;
use crate::corpus::{self, Document};
use crate::index::RetrievalResult;
use crate::pipeline::Pipeline;
use crate::prompt::PromptSettings;
use crate::Result;
use std::collections::BTreeMap;

/// Answer a question, or print its prompt when `dry_run` is set
pub async fn ask(pipeline: &Pipeline, question: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        let prepared = pipeline.prepare(question).await?;
        print_retrieval(&prepared.retrieval);
        println!("\n{}", prepared.prompt.as_str());
        return Ok(());
    }

    println!("\nDOMANDA: {question}\n");
    let answer = pipeline.answer(question).await?;
    println!("RISPOSTA:\n{answer}");
    Ok(())
}

/// Print the ranked recipes for a question
pub async fn retrieve(pipeline: &Pipeline, question: &str, k: Option<usize>) -> Result<()> {
    let k = k.unwrap_or_else(|| pipeline.retriever().top_k());
    let result = pipeline.retriever().retrieve_k(question, k).await?;
    print_retrieval(&result);
    Ok(())
}

/// Validate settings, prompt template and corpus without touching any backend
pub fn check(settings: &Settings) -> Result<()> {
    settings.validate()?;
    PromptSettings::load(settings.retrieval.template_path.as_deref())?;
    let documents = corpus::load_file(&settings.corpus.path)?;

    print!(
        "{}",
        check_report(
            &settings.corpus.path.display().to_string(),
            &documents,
            settings.retrieval.top_k
        )
    );
    Ok(())
}

fn check_report(corpus_path: &str, documents: &[Document], top_k: usize) -> String {
    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in documents {
        *categories.entry(doc.metadata.category.as_str()).or_default() += 1;
    }

    let mut report = String::from("✓ Configuration valid\n");
    report.push_str(&format!(
        "✓ Corpus {corpus_path}: {} recipes\n",
        documents.len()
    ));
    for (category, count) in categories {
        report.push_str(&format!("    {category}: {count}\n"));
    }
    if documents.len() < top_k {
        report.push_str(&format!(
            "  Note: fewer recipes than RETRIEVAL_TOP_K ({top_k}); every query will see the whole corpus\n"
        ));
    }
    report
}

fn print_retrieval(result: &RetrievalResult) {
    if result.is_empty() {
        println!("No recipes in the index.");
        return;
    }

    println!("\nRetrieved {} recipes:\n", result.len());
    for (i, hit) in result.iter().enumerate() {
        println!(
            "{}. {} [{}] (id {}, score {:.4})",
            i + 1,
            hit.document.metadata.title,
            hit.document.metadata.category,
            hit.document.metadata.id,
            hit.score
        );
    }
}
