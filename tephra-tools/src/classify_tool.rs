/* Copyright 2024-2025 Joachim Metz <joachim.metz@gmail.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may
 * obtain a copy of the License at https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
 * WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
 * License for the specific language governing permissions and limitations
 * under the License.
 */

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tephra_classify::{Classification, Classifier, ClassifyMode, Scanner, SpecificationStore};
use tephra_core::mediator::Mediator;
use tephra_core::{DataStreamReference, open_os_data_stream};

mod known_formats;

#[derive(Parser)]
#[command(version, about = "Classify the format of files based on their signatures", long_about = None)]
struct CommandLineArguments {
    #[arg(long, default_value_t = false)]
    /// Enable debug output
    debug: bool,

    #[arg(long, default_value_t = false)]
    /// Scan only the beginning and end of files larger than twice the scan buffer size
    head_tail: bool,

    /// Paths of the files to classify
    #[arg(required = true)]
    sources: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let arguments = CommandLineArguments::parse();

    Mediator {
        debug_output: arguments.debug,
    }
    .make_current();

    let specification_store: SpecificationStore = match known_formats::create_specification_store()
    {
        Ok(specification_store) => specification_store,
        Err(error) => {
            println!("Unable to create specification store with error: {}", error);
            return ExitCode::FAILURE;
        }
    };
    let scanner: Scanner = match Scanner::new(&specification_store) {
        Ok(scanner) => scanner,
        Err(error) => {
            println!("Unable to build scanner with error: {}", error);
            return ExitCode::FAILURE;
        }
    };
    let classify_mode: ClassifyMode = if arguments.head_tail {
        ClassifyMode::HeadTailScan
    } else {
        ClassifyMode::FullScan
    };
    let classifier: Classifier = Classifier::new(&scanner, classify_mode);

    let mut result_code: ExitCode = ExitCode::SUCCESS;

    for source in arguments.sources.iter() {
        let data_stream: DataStreamReference = match open_os_data_stream(source) {
            Ok(data_stream) => data_stream,
            Err(error) => {
                println!(
                    "Unable to open: {} with error:\n{}",
                    source.display(),
                    error
                );
                result_code = ExitCode::FAILURE;
                continue;
            }
        };
        let classifications: Vec<Classification> =
            match classifier.classify_data_stream(&data_stream) {
                Ok(classifications) => classifications,
                Err(error) => {
                    println!(
                        "Unable to classify: {} with error:\n{}",
                        source.display(),
                        error
                    );
                    result_code = ExitCode::FAILURE;
                    continue;
                }
            };
        println!("File: {}", source.display());

        if classifications.is_empty() {
            println!("No classifications found.");
        } else {
            println!("Classifications:");

            for classification in classifications.iter() {
                println!("    format: {}", classification.identifier());
            }
        }
        println!();
    }
    result_code
}
