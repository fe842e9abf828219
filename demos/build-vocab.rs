use std::env;

use visvoc::*;

fn main() {
    // Add normalized SIFT descriptors of every image given on the command line
    let mut voc = Vocabulary::new();
    for path in env::args().skip(1) {
        let before = voc.len();
        add_descriptors_to_vocab(&path, &mut voc).unwrap();
        println!("{}: {} new words", path, voc.len() - before);
    }
    println!("\nVocabulary = {:#?}", voc);
}
