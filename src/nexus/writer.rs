//! NEXUS format writing of a [DataSet].

use crate::model::{DataSet, TaxonNamespace, TreeList};
use crate::newick::writer::{NewickStyle, NewickWriteOptions, tree_to_newick};
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, DIMENSIONS, INDENT, NEXUS_HEADER, NTAX, TAXLABELS, TITLE, TRANSLATE,
    TREE,
};
use crate::parser::utils::escape_label;
use std::io::{self, Write};

/// Options for writing NEXUS files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NexusWriteOptions {
    /// Write a `TRANSLATE` command and 1-based keys in tree statements
    pub translate: bool,
    pub edge_lengths: bool,
    pub internal_labels: bool,
}

impl Default for NexusWriteOptions {
    fn default() -> Self {
        Self {
            translate: true,
            edge_lengths: true,
            internal_labels: true,
        }
    }
}

impl NexusWriteOptions {
    pub fn with_translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    pub fn with_edge_lengths(mut self, edge_lengths: bool) -> Self {
        self.edge_lengths = edge_lengths;
        self
    }

    pub fn with_internal_labels(mut self, internal_labels: bool) -> Self {
        self.internal_labels = internal_labels;
        self
    }

    fn newick_options(&self) -> NewickWriteOptions {
        let style = if self.translate {
            NewickStyle::OneIndexed
        } else {
            NewickStyle::Label
        };
        NewickWriteOptions::default()
            .with_style(style)
            .with_edge_lengths(self.edge_lengths)
            .with_internal_labels(self.internal_labels)
            .with_rooting_comment(true)
    }
}

/// Writes a complete NEXUS file: the header, one `TAXA` block per
/// namespace of the dataset and one `TREES` block per tree list.
///
/// # Errors
/// Returns an I/O error if writing fails.
///
/// # Example
/// ```
/// use phyloio::model::{DataSet, TaxonNamespace, TreeList};
/// use phyloio::newick::parse_str;
/// use phyloio::nexus::{NexusWriteOptions, write_nexus};
///
/// let trees = parse_str("[&R] (Kiwi,Emu);").unwrap();
/// let mut list = TreeList::new(trees[0].taxon_namespace().clone());
/// trees.into_iter().for_each(|tree| list.push(tree));
/// let mut dataset = DataSet::new();
/// dataset.add_tree_list(list);
///
/// let mut out = Vec::new();
/// write_nexus(&mut out, &dataset, &NexusWriteOptions::default()).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("#NEXUS\n"));
/// assert!(text.contains("    TREE tree1 = [&R] (1,2);\n"));
/// ```
pub fn write_nexus(
    sink: &mut dyn Write,
    dataset: &DataSet,
    options: &NexusWriteOptions,
) -> io::Result<()> {
    let mut writer = NexusBlockWriter { sink, options };
    writer.header()?;
    for taxon_namespace in dataset.taxon_namespaces() {
        writer.taxa_block(taxon_namespace)?;
    }
    for tree_list in dataset.tree_lists() {
        writer.trees_block(tree_list)?;
    }
    Ok(())
}

// =#========================================================================#=
// NEXUS BLOCK WRITER
// =#========================================================================$=
/// Writes the parts of a NEXUS file to a sink, chaining like a builder.
struct NexusBlockWriter<'w, 'o> {
    sink: &'w mut dyn Write,
    options: &'o NexusWriteOptions,
}

// ============================================================================
// Nexus Block & Command Writing (private)
// ============================================================================
impl NexusBlockWriter<'_, '_> {
    /// Writes the NEXUS file header ("#NEXUS").
    fn header(&mut self) -> io::Result<&mut Self> {
        self.write_all(NEXUS_HEADER)?.newline()
    }

    /// Writes a TAXA block with title (if labelled), dimensions and taxon labels.
    fn taxa_block(&mut self, taxon_namespace: &TaxonNamespace) -> io::Result<&mut Self> {
        self.newline()?.begin("TAXA")?;

        if let Some(label) = taxon_namespace.label() {
            self.indent()?
                .write_str(TITLE)?
                .space()?
                .write_str(&escape_label(&label))?
                .semicolon_ln()?;
        }

        // "    DIMENSIONS NTAX=n;"
        self.indent()?
            .write_str(DIMENSIONS)?
            .space()?
            .write_str(NTAX)?
            .write_str("=")?
            .write_str(&taxon_namespace.len().to_string())?
            .semicolon_ln()?;

        // "    TAXLABELS\n        label\n    ;"
        self.indent()?.write_str(TAXLABELS)?.newline()?;
        for label in taxon_namespace.labels() {
            self.indent()?
                .indent()?
                .write_str(&escape_label(&label))?
                .newline()?;
        }
        self.indent()?.semicolon_ln()?.end()
    }

    /// Writes a TREES block with optional TRANSLATE command and one TREE
    /// command per tree.
    fn trees_block(&mut self, tree_list: &TreeList) -> io::Result<&mut Self> {
        self.newline()?.begin("TREES")?;

        if let Some(label) = tree_list.label() {
            self.indent()?
                .write_str(TITLE)?
                .space()?
                .write_str(&escape_label(label))?
                .semicolon_ln()?;
        }
        if self.options.translate {
            self.translate_cmd(tree_list.taxon_namespace())?;
        }

        let newick_options = self.options.newick_options();
        for (i, tree) in tree_list.iter().enumerate() {
            let name = match tree.name() {
                Some(name) => escape_label(name),
                None => format!("tree{}", i + 1),
            };

            // "    TREE <name> = <Newick;>"
            self.indent()?
                .write_str(TREE)?
                .space()?
                .write_str(&name)?
                .write_str(" = ")?
                .write_str(&tree_to_newick(tree, &newick_options))?
                .newline()?;
        }
        self.end()
    }

    /// Writes the TRANSLATE command mapping 1-based indices to labels.
    fn translate_cmd(&mut self, taxon_namespace: &TaxonNamespace) -> io::Result<&mut Self> {
        let labels = taxon_namespace.labels();
        if labels.is_empty() {
            return Ok(self);
        }

        self.indent()?.write_str(TRANSLATE)?.newline()?;
        for (i, label) in labels.iter().enumerate() {
            // "        (index + 1) escaped_label,"
            self.indent()?
                .indent()?
                .write_str(&(i + 1).to_string())?
                .space()?
                .write_str(&escape_label(label))?;
            // No comma after last pair
            if i + 1 < labels.len() {
                self.write_str(",")?;
            }
            self.newline()?;
        }
        self.indent()?.semicolon_ln()
    }

    /// Writes "BEGIN <name>;".
    fn begin(&mut self, name: &str) -> io::Result<&mut Self> {
        self.write_str(BLOCK_BEGIN)?
            .space()?
            .write_str(name)?
            .semicolon_ln()
    }

    /// Writes "END;".
    fn end(&mut self) -> io::Result<&mut Self> {
        self.write_str(BLOCK_END)?.semicolon_ln()
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl NexusBlockWriter<'_, '_> {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.sink.write_all(buf)?;
        Ok(self)
    }

    fn write_str(&mut self, s: &str) -> io::Result<&mut Self> {
        self.write_all(s.as_bytes())
    }

    fn space(&mut self) -> io::Result<&mut Self> {
        self.write_all(b" ")
    }

    fn indent(&mut self) -> io::Result<&mut Self> {
        self.write_str(INDENT)
    }

    fn newline(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\n")
    }

    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.write_all(b";\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newick::parse_str;

    fn dataset_from(newick: &str) -> DataSet {
        let trees = parse_str(newick).unwrap();
        let mut list = TreeList::new(trees[0].taxon_namespace().clone());
        for tree in trees {
            list.push(tree);
        }
        let mut dataset = DataSet::new();
        dataset.add_tree_list(list);
        dataset
    }

    fn write(dataset: &DataSet, options: &NexusWriteOptions) -> String {
        let mut out = Vec::new();
        write_nexus(&mut out, dataset, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_with_translate() {
        let dataset = dataset_from("[&U] ('Wilson''s',Storm_petrel:0.5);");
        let expected = "#NEXUS

BEGIN TAXA;
    DIMENSIONS NTAX=2;
    TAXLABELS
        'Wilson''s'
        Storm_petrel
    ;
END;

BEGIN TREES;
    TRANSLATE
        1 'Wilson''s',
        2 Storm_petrel
    ;
    TREE tree1 = [&U] (1,2:0.5);
END;
";
        assert_eq!(write(&dataset, &NexusWriteOptions::default()), expected);
    }

    #[test]
    fn test_write_without_translate() {
        let dataset = dataset_from("((A:1,B:1)x:1,C:2);");
        let options = NexusWriteOptions::default()
            .with_translate(false)
            .with_edge_lengths(false)
            .with_internal_labels(false);
        let text = write(&dataset, &options);
        assert!(!text.contains(TRANSLATE));
        assert!(text.contains("    TREE tree1 = ((A,B),C);\n"));
    }
}
