/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

#[macro_use]
extern crate lazy_static;

use pocketrl::transliteration::{transliterate, transliterate_str};

mod common;
use common::DICTIONARY;

fn tr(text: &str) -> String {
    transliterate_str(&DICTIONARY, text).expect("Failed to transliterate")
}

#[test]
fn sentence() {
    assert_eq!(
        tr("The cat sat on the mat."),
        "𐑞 𐑒𐑨𐑑 𐑕𐑨𐑑 𐑪𐑯 𐑞 𐑥𐑨𐑑."
    );
}

#[test]
fn apostrophes_and_hyphens() {
    assert_eq!(
        tr("Don’t sit on the co-op!"),
        "𐑛𐑴𐑯𐑑 𐑕𐑦𐑑 𐑪𐑯 𐑞 𐑒𐑴𐑪𐑐!"
    );
    assert_eq!(tr("dogs' mat"), "𐑛𐑪𐑜𐑟' 𐑥𐑨𐑑");
    assert_eq!(tr("cat--dog"), "𐑒𐑨𐑑--𐑛𐑪𐑜");
}

#[test]
fn unknown_words_stay() {
    assert_eq!(tr("The Zebra"), "𐑞 zebra");
    assert_eq!(tr("2 cats, 3 dogs"), "2 𐑒𐑨𐑑𐑕, 3 𐑛𐑪𐑜𐑟");
}

#[test]
fn first_sense_is_used() {
    assert_eq!(tr("tomato"), "𐑑𐑩𐑥𐑭𐑑𐑴");
}

#[test]
fn renderings_transliterate_back() {
    assert_eq!(tr("𐑞 𐑒𐑨𐑑 𐑕𐑨𐑑"), "the cat sat");
}

#[test]
fn streaming_input() {
    let mut out = String::new();
    transliterate(&DICTIONARY, "cat\ndog\n".chars(), &mut out).unwrap();
    assert_eq!(out, "𐑒𐑨𐑑\n𐑛𐑪𐑜\n");
}
