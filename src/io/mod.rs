pub mod fasta;
pub mod gff;
