use slicejson::Reader;

#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let mut reader = Reader::new(data, true);
        loop {
            match reader.advance() {
                Ok(true) => continue,
                Ok(false) | Err(_) => break,
            }
        }
    });
}
