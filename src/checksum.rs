use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 4096;

/// Stream a reader through SHA-256 in fixed-size chunks and return the
/// lowercase hex digest. Memory use is independent of input size.
pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn digest_file(path: &Path) -> io::Result<String> {
    digest_reader(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn known_vectors() {
        assert_eq!(
            digest_reader(&b""[..]).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest_reader(&b"abc"[..]).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn deterministic_and_sensitive() {
        let data = b"flow_rate,pressure\n12.5,3.1\n";
        let first = digest_reader(&data[..]).unwrap();
        let second = digest_reader(&data[..]).unwrap();
        assert_eq!(first, second);

        let mut changed = data.to_vec();
        changed[0] ^= 1;
        assert_ne!(digest_reader(changed.as_slice()).unwrap(), first);
    }

    #[test]
    fn input_larger_than_chunk_size() {
        let big = vec![7u8; CHUNK_SIZE * 3 + 17];
        let streamed = digest_reader(big.as_slice()).unwrap();

        let mut hasher = Sha256::new();
        hasher.update(&big);
        assert_eq!(streamed, format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn digest_file_matches_reader() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a,b\n1,2\n").unwrap();
        assert_eq!(
            digest_file(file.path()).unwrap(),
            digest_reader(&b"a,b\n1,2\n"[..]).unwrap()
        );
    }
}
